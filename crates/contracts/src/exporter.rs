//! TelemetryExporter trait - output interface for finished sessions
//!
//! Defines the abstract interface for exporters.

use crate::{ContractError, VehicleSession};

/// Export trait
///
/// Called once per vehicle after the recording session completes.
#[trait_variant::make(TelemetryExporter: Send)]
pub trait LocalTelemetryExporter {
    /// Exporter name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Persist one vehicle's full history
    ///
    /// # Errors
    /// Returns [`ContractError::Export`] naming the vehicle
    async fn export(&mut self, session: &VehicleSession) -> Result<(), ContractError>;

    /// Release resources
    async fn close(&mut self) -> Result<(), ContractError>;
}

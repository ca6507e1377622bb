//! Sync engine error types

use contracts::VehicleId;
use thiserror::Error;

/// Sync engine error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Append for a vehicle that was never registered
    #[error("unknown vehicle {vehicle}: get_or_create must run before append")]
    UnknownVehicle { vehicle: VehicleId },
}

//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the recorder.
//! Business crates depend only on this crate, never on each other's
//! internals.
//!
//! ## Data Flow
//! - Listeners emit [`RawPacket`] tagged with a [`VehicleId`]
//! - The decoder turns a payload into a [`TelemetryRecord`]
//! - Accepted records accumulate in a [`VehicleSession`]
//! - A finished session is handed to every [`TelemetryExporter`]

mod config;
mod error;
mod exporter;
mod packet;
mod session;
mod telemetry;
mod vehicle_id;

pub use config::*;
pub use error::*;
pub use exporter::{LocalTelemetryExporter, TelemetryExporter};
pub use packet::RawPacket;
pub use session::VehicleSession;
pub use telemetry::*;
pub use vehicle_id::VehicleId;

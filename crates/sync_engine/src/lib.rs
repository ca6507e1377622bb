//! # Sync Engine
//!
//! Multi-vehicle recording synchronization.
//!
//! Responsibilities:
//! - Hold recording until every known vehicle reports the race as on
//! - Seed each history with that vehicle's first race-on record
//! - Append every record once recording, and detect when all vehicles
//!   have finished
//!
//! ## Usage Example
//!
//! ```ignore
//! use sync_engine::{RecordingSession, SessionEvent};
//!
//! let mut session = RecordingSession::new();
//!
//! // Push records as they are decoded
//! if session.push(&vehicle, record)? == SessionEvent::Finished {
//!     let sessions = session.into_sessions();
//!     // Export every vehicle
//! }
//! ```

mod controller;
mod error;
mod registry;
mod session;

// Re-exports
pub use controller::{Gate, SyncController, SyncState, VehicleReadiness};
pub use error::SyncError;
pub use registry::VehicleRegistry;
pub use session::{RecordingSession, SessionEvent};

// Re-export contracts types
pub use contracts::{TelemetryRecord, VehicleId, VehicleSession};

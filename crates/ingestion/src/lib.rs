//! # Ingestion
//!
//! Telemetry ingestion module.
//!
//! Responsibilities:
//! - Bind one UDP listener per configured port (all-or-nothing)
//! - Forward raw datagrams, tagged with the port's vehicle id, into one
//!   bounded queue (producers wait when it is full)
//! - Decode datagrams into `TelemetryRecord`
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{decode, IngestionPipeline};
//!
//! let mut pipeline = IngestionPipeline::bind(&config.listener, &ports).await?;
//! let rx = pipeline.take_receiver().unwrap();
//! pipeline.start_all()?;
//!
//! while let Ok(packet) = rx.recv().await {
//!     match decode(&packet.payload) {
//!         Ok(record) => { /* hand to the sync engine */ }
//!         Err(e) => tracing::warn!(error = %e, "dropping packet"),
//!     }
//! }
//! ```
//!
//! ## Mock Testing
//!
//! ```ignore
//! use ingestion::{MockPacket, MockSimulator};
//!
//! let sim = MockSimulator::bind().await?;
//! sim.send(target, &MockPacket::new().race_on(true).build()).await?;
//! ```

mod config;
mod decoder;
mod error;
mod listener;
mod mock;
mod pipeline;

// Re-exports
pub use config::{IngestionMetrics, MetricsSnapshot};
pub use contracts::{RawPacket, TelemetryRecord};
pub use decoder::{decode, decode_at, MIN_PACKET_LEN, PATCHED_LEN};
pub use error::{DecodeError, IngestionError, Result};
pub use listener::UdpListener;
pub use mock::{MockPacket, MockSimulator, WIRE_PACKET_LEN};
pub use pipeline::IngestionPipeline;

//! # Observability
//!
//! Prometheus metrics and run statistics for the recorder.
//!
//! ## Features
//!
//! - Prometheus metrics endpoint
//! - Metric names and descriptions shared by every crate
//! - Per-vehicle recording statistics for the end-of-run summary
//!
//! ## Usage Example
//!
//! ```ignore
//! use observability::{init_metrics_only, RecordingStatsAggregator};
//!
//! init_metrics_only(9000)?;
//!
//! let mut stats = RecordingStatsAggregator::new();
//! stats.update(&vehicle, &record);
//! println!("{}", stats.summary());
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;

// Re-exports
pub use crate::metrics::{
    describe_metrics, record_decode_error, RecordingStatsAggregator, RecordingSummary,
    RunningStats, StatsSummary, VehicleSummary, DECODE_ERRORS_TOTAL, EXPORTS_TOTAL,
    PACKETS_RECEIVED_TOTAL, RECORDING_STARTED_TOTAL, RECORDS_APPENDED_TOTAL, VEHICLES,
};

/// Install the Prometheus recorder with an HTTP listener on `0.0.0.0:port`
///
/// Tracing is initialized by the binary, not here.
pub fn init_metrics_only(port: u16) -> Result<()> {
    let builder = PrometheusBuilder::new();
    builder
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    describe_metrics();
    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}

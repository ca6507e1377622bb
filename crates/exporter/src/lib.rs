//! # Exporter
//!
//! Persistence of finished recording sessions.
//!
//! Responsibilities:
//! - Build exporters from `ExporterConfig`
//! - Write every vehicle's history through every exporter
//! - Isolate failures per vehicle and report them together

pub mod error;
pub mod export;
pub mod exporters;

pub use contracts::{TelemetryExporter, VehicleSession};
pub use error::ExporterError;
pub use export::{create_exporter, create_exporters, export_all, ExportFailure, ExportReport, Exporter};
pub use exporters::{CsvExporter, CsvExporterConfig, LogExporter, CSV_HEADER};

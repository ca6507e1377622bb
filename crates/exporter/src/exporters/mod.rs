//! Exporter implementations
//!
//! Contains CsvExporter and LogExporter.

mod csv;
mod log;

pub use self::csv::{CsvExporter, CsvExporterConfig, CSV_HEADER};
pub use self::log::LogExporter;

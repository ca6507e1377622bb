//! Exporter error types

use thiserror::Error;

/// Exporter-specific errors
#[derive(Debug, Error)]
pub enum ExporterError {
    /// Exporter creation error
    #[error("failed to create exporter '{name}': {message}")]
    ExporterCreation { name: String, message: String },

    /// Export error (from contract)
    #[error("export error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl ExporterError {
    /// Create an exporter creation error
    pub fn exporter_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExporterCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}

//! Layered error definitions
//!
//! Categorized by source: config / ports / export

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Malformed port specification
    #[error("invalid port specification {input:?}: {message}")]
    InvalidPortSpec { input: String, message: String },

    // ===== Export Errors =====
    /// A vehicle history could not be persisted
    #[error("exporter '{exporter}' failed for vehicle '{vehicle}': {message}")]
    Export {
        exporter: String,
        vehicle: String,
        message: String,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create port specification error, echoing the offending input
    pub fn invalid_port_spec(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPortSpec {
            input: input.into(),
            message: message.into(),
        }
    }

    /// Create export error
    pub fn export(
        exporter: impl Into<String>,
        vehicle: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Export {
            exporter: exporter.into(),
            vehicle: vehicle.into(),
            message: message.into(),
        }
    }
}

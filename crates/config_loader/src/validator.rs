//! Configuration validation
//!
//! Rules:
//! - listener.ports parses as a port specification
//! - queue_capacity > 0
//! - recv_buffer_size can hold a full telemetry packet
//! - exporter names are non-empty and unique

use std::collections::HashSet;

use contracts::{ContractError, RecorderConfig};

use crate::ports::parse_ports;

/// Smallest datagram the decoder accepts
pub const MIN_RECV_BUFFER: usize = 323;

/// Validate a RecorderConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &RecorderConfig) -> Result<(), ContractError> {
    validate_listener(config)?;
    validate_exporters(config)?;
    Ok(())
}

fn validate_listener(config: &RecorderConfig) -> Result<(), ContractError> {
    let listener = &config.listener;

    parse_ports(&listener.ports)?;

    if listener.queue_capacity == 0 {
        return Err(ContractError::config_validation(
            "listener.queue_capacity",
            "queue_capacity must be > 0",
        ));
    }

    if listener.recv_buffer_size < MIN_RECV_BUFFER {
        return Err(ContractError::config_validation(
            "listener.recv_buffer_size",
            format!(
                "recv_buffer_size must be >= {MIN_RECV_BUFFER}, got {}",
                listener.recv_buffer_size
            ),
        ));
    }

    Ok(())
}

fn validate_exporters(config: &RecorderConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (index, exporter) in config.exporters.iter().enumerate() {
        if exporter.name.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("exporters[{index}].name"),
                "exporter name cannot be empty",
            ));
        }
        if !seen.insert(&exporter.name) {
            return Err(ContractError::config_validation(
                format!("exporters[name={}]", exporter.name),
                "duplicate exporter name",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ExporterConfig, ExporterType};
    use std::collections::HashMap;

    #[test]
    fn test_default_is_valid() {
        assert!(validate(&RecorderConfig::default()).is_ok());
    }

    #[test]
    fn test_bad_ports_rejected() {
        let mut config = RecorderConfig::default();
        config.listener.ports = "5030-70000".to_string();
        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ContractError::InvalidPortSpec { .. }));
    }

    #[test]
    fn test_zero_queue_rejected() {
        let mut config = RecorderConfig::default();
        config.listener.queue_capacity = 0;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("queue_capacity"));
    }

    #[test]
    fn test_small_recv_buffer_rejected() {
        let mut config = RecorderConfig::default();
        config.listener.recv_buffer_size = 256;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_duplicate_exporter_rejected() {
        let mut config = RecorderConfig::default();
        config.exporters = vec![
            ExporterConfig::csv("out", "."),
            ExporterConfig {
                name: "out".to_string(),
                exporter_type: ExporterType::Log,
                params: HashMap::new(),
            },
        ];
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("duplicate exporter name"));
    }
}

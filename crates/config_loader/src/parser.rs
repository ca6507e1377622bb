//! Configuration parsing
//!
//! Supports TOML (primary) and JSON.

use contracts::{ContractError, RecorderConfig};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (recommended)
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Infer format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<RecorderConfig, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<RecorderConfig, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse according to format
pub fn parse(content: &str, format: ConfigFormat) -> Result<RecorderConfig, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::ExporterType;

    #[test]
    fn test_parse_toml_full() {
        let content = r#"
[listener]
ports = "5030,5031"
bind_address = "127.0.0.1"
queue_capacity = 64

[[exporters]]
name = "csv"
exporter_type = "csv"
params = { output_dir = "races" }

[[exporters]]
name = "summary"
exporter_type = "log"
"#;
        let config = parse_toml(content).unwrap();
        assert_eq!(config.listener.ports, "5030,5031");
        assert_eq!(config.listener.bind_address, "127.0.0.1");
        assert_eq!(config.listener.queue_capacity, 64);
        assert_eq!(config.listener.recv_buffer_size, 1024);
        assert_eq!(config.exporters.len(), 2);
        assert_eq!(config.exporters[1].exporter_type, ExporterType::Log);
        assert_eq!(
            config.exporters[0].params.get("output_dir").map(String::as_str),
            Some("races")
        );
    }

    #[test]
    fn test_parse_toml_empty_uses_defaults() {
        let config = parse_toml("").unwrap();
        assert_eq!(config.listener.ports, "5030-5040");
        assert!(config.exporters.is_empty());
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "listener": { "ports": "6000-6001" },
            "exporters": [{ "name": "log", "exporter_type": "log" }]
        }"#;
        let config = parse_json(content).unwrap();
        assert_eq!(config.listener.ports, "6000-6001");
        assert_eq!(config.exporters.len(), 1);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let result = parse_toml("invalid toml [[[");
        assert!(matches!(result, Err(ContractError::ConfigParse { .. })));
    }

    #[test]
    fn test_unknown_exporter_type() {
        let content = r#"
[[exporters]]
name = "x"
exporter_type = "parquet"
"#;
        assert!(parse_toml(content).is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("TOML"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("json"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}

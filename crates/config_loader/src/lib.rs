//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse port specifications (`5030-5040`, `5030,5031`)
//! - Parse TOML/JSON recorder configuration files
//! - Validate configuration legality
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("recorder.toml")).unwrap();
//! println!("Ports: {}", config.listener.ports);
//! ```

mod parser;
mod ports;
mod validator;

pub use contracts::RecorderConfig;
pub use parser::ConfigFormat;
pub use ports::parse_ports;
pub use validator::validate;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<RecorderConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<RecorderConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Serialize RecorderConfig to TOML string
    pub fn to_toml(config: &RecorderConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_str_validates() {
        let content = r#"
[listener]
ports = "0-10"
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(matches!(result, Err(ContractError::InvalidPortSpec { .. })));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = RecorderConfig::default();
        let text = ConfigLoader::to_toml(&config).unwrap();
        let parsed = ConfigLoader::load_from_str(&text, ConfigFormat::Toml).unwrap();
        assert_eq!(parsed.listener.ports, config.listener.ports);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = ConfigLoader::load_from_path(Path::new("recorder.yaml"));
        assert!(matches!(result, Err(ContractError::ConfigParse { .. })));
    }
}

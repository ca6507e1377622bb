//! Command implementations.

mod run;
mod validate;

pub use run::run_pipeline;
pub use validate::run_validate;

use std::path::{Path, PathBuf};

use config_loader::{parse_ports, validate, ConfigLoader};
use contracts::{ExporterType, RecorderConfig};
use tracing::info;

use crate::error::{CliError, Result};

/// Values given on the command line, applied over the file configuration
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub ports: Option<String>,
    pub bind: Option<String>,
    pub queue_capacity: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

/// Configuration after file loading, overrides, and validation
#[derive(Debug)]
pub struct ResolvedConfig {
    pub config: RecorderConfig,
    pub ports: Vec<u16>,
}

/// Load the optional file, apply overrides, validate, and expand the ports
pub fn resolve_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<ResolvedConfig> {
    let mut config = match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config_not_found(path.display().to_string()));
            }
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)?
        }
        None => RecorderConfig::default(),
    };

    apply_overrides(&mut config, overrides);
    validate(&config)?;
    let ports = parse_ports(&config.listener.ports)?;

    Ok(ResolvedConfig { config, ports })
}

fn apply_overrides(config: &mut RecorderConfig, overrides: ConfigOverrides) {
    if let Some(ports) = overrides.ports {
        config.listener.ports = ports;
    }
    if let Some(bind) = overrides.bind {
        config.listener.bind_address = bind;
    }
    if let Some(capacity) = overrides.queue_capacity {
        config.listener.queue_capacity = capacity;
    }
    if let Some(dir) = overrides.output_dir {
        config.exporters = config.effective_exporters();
        for exporter in &mut config.exporters {
            if exporter.exporter_type == ExporterType::Csv {
                exporter
                    .params
                    .insert("output_dir".to_string(), dir.display().to_string());
            }
        }
    }
}

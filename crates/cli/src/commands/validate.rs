//! `validate` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::{resolve_config, ConfigOverrides};
use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    config_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    ports: Vec<u16>,
    bind_address: String,
    queue_capacity: usize,
    exporter_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = ?args.config, "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.as_ref().map(|p| p.display().to_string());
    let overrides = ConfigOverrides {
        ports: args.ports.clone(),
        ..Default::default()
    };

    match resolve_config(args.config.as_deref(), overrides) {
        Ok(resolved) => {
            let warnings = collect_warnings(&resolved.config);
            let config = &resolved.config;

            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    bind_address: config.listener.bind_address.clone(),
                    queue_capacity: config.listener.queue_capacity,
                    exporter_count: config.effective_exporters().len(),
                    ports: resolved.ports,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &contracts::RecorderConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.exporters.is_empty() {
        warnings.push("No exporters configured - writing CSV to the working directory".to_string());
    }

    let capacity = config.listener.queue_capacity;
    if capacity < 60 {
        warnings.push(format!(
            "queue_capacity {capacity} is below one second of a single 60 Hz car"
        ));
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    let source = result.config_path.as_deref().unwrap_or("<defaults>");

    if result.valid {
        println!("✓ Configuration is valid: {}", source);

        if let Some(ref summary) = result.summary {
            println!("\n  Ports: {:?}", summary.ports);
            println!("  Bind address: {}", summary.bind_address);
            println!("  Queue capacity: {}", summary.queue_capacity);
            println!("  Exporters: {}", summary.exporter_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", source);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}

//! `run` command implementation.

use anyhow::{Context, Result};
use tracing::info;

use super::{resolve_config, ConfigOverrides, ResolvedConfig};
use crate::cli::RunArgs;
use crate::pipeline::{Pipeline, PipelineConfig};

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        ports: args.ports.clone(),
        bind: args.bind.clone(),
        queue_capacity: args.queue_capacity,
        output_dir: args.output_dir.clone(),
    };
    let resolved = resolve_config(args.config.as_deref(), overrides)
        .context("Failed to resolve configuration")?;

    info!(
        ports = %resolved.config.listener.ports,
        listeners = resolved.ports.len(),
        bind = %resolved.config.listener.bind_address,
        exporters = resolved.config.effective_exporters().len(),
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&resolved);
        return Ok(());
    }

    let pipeline = Pipeline::new(PipelineConfig {
        listener: resolved.config.listener.clone(),
        exporters: resolved.config.effective_exporters(),
        ports: resolved.ports,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    });

    info!("Starting recorder...");
    let stats = pipeline.run().await.context("Recorder failed")?;

    info!(
        vehicles = stats.vehicles.len(),
        packets = stats.packets_received,
        duration_secs = stats.duration.as_secs_f64(),
        "Recording completed"
    );
    stats.print_summary();

    Ok(())
}

/// Print configuration summary for dry-run mode
fn print_config_summary(resolved: &ResolvedConfig) {
    let listener = &resolved.config.listener;

    println!("\n=== Configuration Summary ===\n");
    println!("Listener:");
    println!("  Ports: {} ({} listeners)", listener.ports, resolved.ports.len());
    println!("  Bind address: {}", listener.bind_address);
    println!("  Queue capacity: {}", listener.queue_capacity);
    println!("  Receive buffer: {} bytes", listener.recv_buffer_size);

    let exporters = resolved.config.effective_exporters();
    println!("\nExporters ({}):", exporters.len());
    for exporter in &exporters {
        match exporter.params.get("output_dir") {
            Some(dir) => println!("  - {} ({:?}) -> {}", exporter.name, exporter.exporter_type, dir),
            None => println!("  - {} ({:?})", exporter.name, exporter.exporter_type),
        }
    }

    println!();
}

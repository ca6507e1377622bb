//! Pipeline orchestrator - coordinates all components.

use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{ExporterConfig, ListenerConfig};
use exporter::{create_exporters, export_all};
use ingestion::IngestionPipeline;
use observability::RecordingStatsAggregator;
use sync_engine::RecordingSession;
use tracing::{info, warn};

use super::{record_until_finished, PipelineStats};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Listener settings
    pub listener: ListenerConfig,

    /// Ports to bind, already expanded
    pub ports: Vec<u16>,

    /// Exporters run once the race finishes
    pub exporters: Vec<ExporterConfig>,

    /// Metrics server port (None = disabled)
    pub metrics_port: Option<u16>,
}

/// Main pipeline orchestrator
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run to completion: bind, record until every car finishes, export.
    pub async fn run(self) -> Result<PipelineStats> {
        let start_time = Instant::now();

        // Initialize Metrics (optional)
        if let Some(port) = self.config.metrics_port {
            observability::init_metrics_only(port)?;
            info!("Metrics endpoint available on port {}", port);
        }

        // Exporters first, so an unusable output directory fails before listening
        let mut exporters =
            create_exporters(&self.config.exporters).context("Failed to create exporters")?;

        // Bind every port before anything starts
        let mut ingestion = IngestionPipeline::bind(&self.config.listener, &self.config.ports)
            .await
            .context("Failed to bind listeners")?;
        let rx = ingestion
            .take_receiver()
            .context("Failed to get ingestion receiver")?;
        ingestion.start_all()?;

        for (vehicle, addr) in ingestion.endpoints() {
            info!(vehicle = %vehicle, %addr, "Listening");
        }
        info!(
            listeners = ingestion.listener_count(),
            "Waiting for every car to report race on"
        );

        let mut session = RecordingSession::new();
        let mut recording_stats = RecordingStatsAggregator::new();
        let metrics = ingestion.metrics();

        let outcome =
            record_until_finished(&rx, &mut session, &mut recording_stats, &metrics).await;

        info!("Shutting down listeners...");
        ingestion.stop_all();

        let sessions = session.into_sessions();
        let vehicles: Vec<_> = sessions
            .iter()
            .map(|s| (s.name().to_string(), s.len()))
            .collect();
        info!(vehicles = vehicles.len(), "Exporting recorded sessions");

        let report = export_all(&mut exporters, &sessions).await;
        let export_failures: Vec<String> = report
            .failures
            .iter()
            .map(|f| format!("{} / {}: {}", f.exporter, f.vehicle, f.error))
            .collect();
        if !report.is_success() {
            warn!(failed = export_failures.len(), "Some exports failed");
        }

        let snapshot = metrics.snapshot();
        let stats = PipelineStats {
            outcome,
            packets_received: snapshot.packets_received,
            decode_errors: snapshot.decode_errors,
            vehicles,
            exported: report.exported,
            export_failures,
            duration: start_time.elapsed(),
            summary: recording_stats.summary(),
        };

        info!(
            duration_secs = stats.duration.as_secs_f64(),
            rate = format!("{:.1}", stats.packet_rate()),
            "Recorder shutdown complete"
        );

        Ok(stats)
    }
}

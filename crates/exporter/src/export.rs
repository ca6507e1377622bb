//! Export - fan finished sessions out to every configured exporter

use contracts::{ContractError, ExporterConfig, ExporterType, TelemetryExporter, VehicleSession};
use tracing::{info, instrument, warn};

use crate::error::ExporterError;
use crate::exporters::{CsvExporter, LogExporter};

/// A configured exporter
///
/// `TelemetryExporter` has async methods, so exporters are held by value
/// and dispatched through this enum.
pub enum Exporter {
    Csv(CsvExporter),
    Log(LogExporter),
}

impl Exporter {
    pub fn name(&self) -> &str {
        match self {
            Self::Csv(e) => e.name(),
            Self::Log(e) => e.name(),
        }
    }

    pub async fn export(&mut self, session: &VehicleSession) -> Result<(), ContractError> {
        match self {
            Self::Csv(e) => e.export(session).await,
            Self::Log(e) => e.export(session).await,
        }
    }

    pub async fn close(&mut self) -> Result<(), ContractError> {
        match self {
            Self::Csv(e) => e.close().await,
            Self::Log(e) => e.close().await,
        }
    }
}

/// Create an Exporter from configuration
#[instrument(
    name = "exporter_create",
    skip(config),
    fields(exporter = %config.name, exporter_type = ?config.exporter_type)
)]
pub fn create_exporter(config: &ExporterConfig) -> Result<Exporter, ExporterError> {
    match config.exporter_type {
        ExporterType::Csv => {
            let exporter = CsvExporter::from_params(&config.name, &config.params)
                .map_err(|e| ExporterError::exporter_creation(&config.name, e.to_string()))?;
            Ok(Exporter::Csv(exporter))
        }
        ExporterType::Log => Ok(Exporter::Log(LogExporter::new(&config.name))),
    }
}

/// Create every configured exporter, failing on the first that cannot be built
pub fn create_exporters(configs: &[ExporterConfig]) -> Result<Vec<Exporter>, ExporterError> {
    configs.iter().map(create_exporter).collect()
}

/// One failed (exporter, vehicle) pair
#[derive(Debug)]
pub struct ExportFailure {
    pub exporter: String,
    pub vehicle: String,
    pub error: ContractError,
}

/// Outcome of exporting every session
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Successful (exporter, vehicle) exports
    pub exported: usize,
    /// Everything that failed, in attempt order
    pub failures: Vec<ExportFailure>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Export every session through every exporter.
///
/// A failure is recorded and the remaining vehicles are still attempted.
#[instrument(
    name = "export_all",
    skip(exporters, sessions),
    fields(exporters = exporters.len(), vehicles = sessions.len())
)]
pub async fn export_all(exporters: &mut [Exporter], sessions: &[VehicleSession]) -> ExportReport {
    let mut report = ExportReport::default();

    for exporter in exporters.iter_mut() {
        for session in sessions {
            match exporter.export(session).await {
                Ok(()) => {
                    report.exported += 1;
                    record_export(exporter.name(), "ok");
                }
                Err(error) => {
                    warn!(
                        exporter = exporter.name(),
                        vehicle = %session.id(),
                        error = %error,
                        "export failed"
                    );
                    record_export(exporter.name(), "error");
                    report.failures.push(ExportFailure {
                        exporter: exporter.name().to_string(),
                        vehicle: session.id().to_string(),
                        error,
                    });
                }
            }
        }

        if let Err(error) = exporter.close().await {
            warn!(exporter = exporter.name(), error = %error, "exporter close failed");
        }
    }

    info!(
        exported = report.exported,
        failed = report.failures.len(),
        "export finished"
    );
    report
}

fn record_export(exporter: &str, status: &'static str) {
    metrics::counter!(
        observability::EXPORTS_TOTAL,
        "exporter" => exporter.to_string(),
        "status" => status
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{TelemetryRecord, VehicleId};
    use std::fs;
    use tempfile::tempdir;

    fn session(port: u16, records: usize) -> VehicleSession {
        let mut session = VehicleSession::new(VehicleId::from_port(port));
        for _ in 0..records {
            session.push(TelemetryRecord::default());
        }
        session
    }

    #[test]
    fn test_create_exporters_from_config() {
        let dir = tempdir().unwrap();
        let configs = vec![
            ExporterConfig::csv("csv", dir.path().to_string_lossy()),
            ExporterConfig {
                name: "log".to_string(),
                exporter_type: ExporterType::Log,
                params: Default::default(),
            },
        ];

        let exporters = create_exporters(&configs).unwrap();
        let names: Vec<_> = exporters.iter().map(Exporter::name).collect();
        assert_eq!(names, ["csv", "log"]);
    }

    #[test]
    fn test_create_csv_exporter_fails_on_unusable_dir() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let config = ExporterConfig::csv("csv", blocker.join("out").to_string_lossy());
        let err = create_exporter(&config).err().unwrap();
        assert!(matches!(err, ExporterError::ExporterCreation { .. }));
    }

    #[tokio::test]
    async fn test_export_failure_is_isolated_per_vehicle() {
        let dir = tempdir().unwrap();
        let config = ExporterConfig::csv("csv", dir.path().to_string_lossy());
        let mut exporters = create_exporters(&[config]).unwrap();

        // Block the first vehicle's file
        fs::create_dir(dir.path().join("Car-5030.csv")).unwrap();
        let sessions = vec![session(5030, 2), session(5031, 3)];

        let report = export_all(&mut exporters, &sessions).await;
        assert!(!report.is_success());
        assert_eq!(report.exported, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].vehicle, "5030");
        assert_eq!(report.failures[0].exporter, "csv");

        let text = fs::read_to_string(dir.path().join("Car-5031.csv")).unwrap();
        assert_eq!(text.lines().count(), 4);
    }
}

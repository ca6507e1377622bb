//! LogExporter - logs a per-vehicle summary via tracing

use contracts::{ContractError, TelemetryExporter, VehicleSession};
use tracing::{info, instrument};

/// Exporter that logs session summaries instead of writing files
pub struct LogExporter {
    name: String,
    exported: usize,
}

impl LogExporter {
    /// Create a new LogExporter with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exported: 0,
        }
    }

    fn log_session_summary(&self, session: &VehicleSession) {
        let records = session.records();
        let first = records.first().map(|r| r.timestamp_rfc3339());
        let last = records.last().map(|r| r.timestamp_rfc3339());
        let best_lap = records
            .iter()
            .map(|r| r.best_lap)
            .filter(|lap| *lap > 0.0)
            .fold(None, |best: Option<f64>, lap| Some(best.map_or(lap, |b| b.min(lap))));

        info!(
            exporter = %self.name,
            vehicle = %session.id(),
            car = session.name(),
            records = records.len(),
            first = first.as_deref().unwrap_or("-"),
            last = last.as_deref().unwrap_or("-"),
            best_lap = ?best_lap,
            "session summary"
        );
    }
}

impl TelemetryExporter for LogExporter {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_exporter_export",
        skip(self, session),
        fields(exporter = %self.name, vehicle = %session.id())
    )]
    async fn export(&mut self, session: &VehicleSession) -> Result<(), ContractError> {
        self.log_session_summary(session);
        self.exported += 1;
        Ok(())
    }

    #[instrument(name = "log_exporter_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        info!(exporter = %self.name, sessions = self.exported, "LogExporter closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{TelemetryRecord, VehicleId};

    #[tokio::test]
    async fn test_log_exporter_export() {
        let mut exporter = LogExporter::new("test_log");
        let mut session = VehicleSession::new(VehicleId::from_port(5030));
        session.push(TelemetryRecord::default());

        assert!(exporter.export(&session).await.is_ok());
        assert!(exporter.close().await.is_ok());
        assert_eq!(exporter.exported, 1);
    }

    #[tokio::test]
    async fn test_log_exporter_empty_session() {
        let mut exporter = LogExporter::new("my_logger");
        let session = VehicleSession::new(VehicleId::from_port(5031));
        assert!(exporter.export(&session).await.is_ok());
        assert_eq!(exporter.name(), "my_logger");
    }
}

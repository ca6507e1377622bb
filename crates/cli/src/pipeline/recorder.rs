//! Ingestion loop
//!
//! Sole consumer of the packet queue and sole owner of the recording
//! session. Decode, gate, append, check completion; one packet at a time.

use async_channel::Receiver;
use contracts::RawPacket;
use ingestion::IngestionMetrics;
use observability::RecordingStatsAggregator;
use sync_engine::{RecordingSession, SessionEvent};
use tracing::{error, info, instrument, warn};

/// Why the loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// Every vehicle's latest record reports the race as off
    Finished,
    /// The queue closed before the race finished
    QueueClosed,
}

/// Drain `rx` until the session finishes or the queue closes.
#[instrument(name = "ingestion_loop", skip_all)]
pub async fn record_until_finished(
    rx: &Receiver<RawPacket>,
    session: &mut RecordingSession,
    stats: &mut RecordingStatsAggregator,
    metrics: &IngestionMetrics,
) -> LoopOutcome {
    while let Ok(packet) = rx.recv().await {
        let vehicle = packet.vehicle_id;

        let record = match ingestion::decode(&packet.payload) {
            Ok(record) => record,
            Err(e) => {
                warn!(vehicle = %vehicle, error = %e, "dropping undecodable packet");
                metrics.record_decode_error();
                observability::record_decode_error(&vehicle);
                stats.record_decode_error();
                continue;
            }
        };

        stats.update(&vehicle, &record);

        match session.push(&vehicle, record) {
            Ok(SessionEvent::Finished) => {
                info!("All cars finished the race");
                return LoopOutcome::Finished;
            }
            Ok(SessionEvent::Started { vehicles }) => {
                info!(vehicles, "Recording started");
            }
            Ok(SessionEvent::Waiting { .. } | SessionEvent::Recorded) => {}
            Err(e) => error!(vehicle = %vehicle, error = %e, "record rejected"),
        }
    }

    warn!("packet queue closed before the race finished");
    LoopOutcome::QueueClosed
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_channel::bounded;
    use contracts::VehicleId;
    use ingestion::MockPacket;
    use sync_engine::SyncState;

    fn packet(port: u16, race_on: bool, tick: u32) -> RawPacket {
        RawPacket::new(
            VehicleId::from_port(port),
            MockPacket::driving(race_on, tick).build(),
        )
    }

    #[tokio::test]
    async fn test_loop_stops_at_finish_and_leaves_rest_queued() {
        let (tx, rx) = bounded(16);
        for p in [
            packet(5031, false, 1),
            packet(5030, true, 2),
            packet(5030, true, 3),
            packet(5031, true, 4),
            packet(5030, false, 5),
            packet(5031, false, 6),
            packet(5031, false, 7),
        ] {
            tx.send(p).await.unwrap();
        }

        let mut session = RecordingSession::new();
        let mut stats = RecordingStatsAggregator::new();
        let metrics = IngestionMetrics::new();

        let outcome = record_until_finished(&rx, &mut session, &mut stats, &metrics).await;
        assert_eq!(outcome, LoopOutcome::Finished);
        assert_eq!(rx.len(), 1, "packets after the finish are not consumed");

        let sessions = session.into_sessions();
        let counts: Vec<_> = sessions.iter().map(|s| (s.name().to_string(), s.len())).collect();
        assert_eq!(
            counts,
            [("Car-5031".to_string(), 2), ("Car-5030".to_string(), 2)]
        );
        assert_eq!(stats.summary().vehicles[0].records, 3);
    }

    #[tokio::test]
    async fn test_short_packets_are_skipped() {
        let (tx, rx) = bounded(8);
        tx.send(RawPacket::new(VehicleId::from_port(5030), vec![0u8; 100]))
            .await
            .unwrap();
        tx.send(packet(5030, false, 1)).await.unwrap();
        drop(tx);

        let mut session = RecordingSession::new();
        let mut stats = RecordingStatsAggregator::new();
        let metrics = IngestionMetrics::new();

        let outcome = record_until_finished(&rx, &mut session, &mut stats, &metrics).await;
        assert_eq!(outcome, LoopOutcome::QueueClosed);
        assert_eq!(metrics.snapshot().decode_errors, 1);
        assert_eq!(stats.summary().decode_errors, 1);
        assert_eq!(session.state(), SyncState::WaitingForStart);
        assert_eq!(session.registry().len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_first_packet_does_not_register_vehicle() {
        let (tx, rx) = bounded(8);
        tx.send(RawPacket::new(VehicleId::from_port(5035), vec![1u8; 10]))
            .await
            .unwrap();
        drop(tx);

        let mut session = RecordingSession::new();
        let mut stats = RecordingStatsAggregator::new();
        let metrics = IngestionMetrics::new();

        record_until_finished(&rx, &mut session, &mut stats, &metrics).await;
        assert!(session.registry().is_empty());
    }
}

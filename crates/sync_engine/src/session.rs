//! Recording session
//!
//! Controller and registry owned together by the ingestion loop.

use contracts::{TelemetryRecord, VehicleId, VehicleSession};
use tracing::{debug, info};

use crate::controller::{Gate, SyncController, SyncState};
use crate::error::SyncError;
use crate::registry::VehicleRegistry;

/// Outcome of pushing one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Still waiting; `ready` of `known` vehicles reported race on
    Waiting { ready: usize, known: usize },
    /// Recording started with this many vehicles
    Started { vehicles: usize },
    /// Record appended, run not finished
    Recorded,
    /// Every vehicle's latest record has the race off
    Finished,
}

#[derive(Debug, Default)]
pub struct RecordingSession {
    controller: SyncController,
    registry: VehicleRegistry,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the vehicle, gate the record, and check completion.
    pub fn push(
        &mut self,
        vehicle: &VehicleId,
        record: TelemetryRecord,
    ) -> Result<SessionEvent, SyncError> {
        self.registry.get_or_create(vehicle);

        if self.controller.is_recording() {
            debug!(
                vehicle = %vehicle,
                speed_kph = record.speed_kph,
                gear = record.gear,
                race_on = record.is_race_on,
                "record"
            );
        }

        let event = match self.controller.on_record(vehicle, record, &mut self.registry)? {
            Gate::Buffered | Gate::Discarded => {
                let (ready, known) = (self.controller.ready_count(), self.controller.known_count());
                info!("waiting for players: {ready}/{known} reported race on");
                return Ok(SessionEvent::Waiting { ready, known });
            }
            Gate::Started { vehicles } => SessionEvent::Started { vehicles },
            Gate::Appended => {
                metrics::counter!(
                    observability::RECORDS_APPENDED_TOTAL,
                    "vehicle" => vehicle.to_string()
                )
                .increment(1);
                SessionEvent::Recorded
            }
        };

        if self.registry.is_finished() {
            info!(vehicles = self.registry.len(), "all vehicles finished");
            return Ok(SessionEvent::Finished);
        }
        Ok(event)
    }

    pub fn state(&self) -> SyncState {
        self.controller.state()
    }

    pub fn controller(&self) -> &SyncController {
        &self.controller
    }

    pub fn registry(&self) -> &VehicleRegistry {
        &self.registry
    }

    pub fn is_finished(&self) -> bool {
        self.controller.is_recording() && self.registry.is_finished()
    }

    /// Finished sessions in first-seen order
    pub fn into_sessions(self) -> Vec<VehicleSession> {
        self.registry.into_sessions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(race_on: bool, timestamp_ms: u32) -> TelemetryRecord {
        TelemetryRecord {
            is_race_on: race_on,
            timestamp_ms,
            ..Default::default()
        }
    }

    #[test]
    fn test_two_vehicle_race() {
        let a = VehicleId::from_port(5030);
        let b = VehicleId::from_port(5031);
        let mut session = RecordingSession::new();

        // A: [on, on, off], B: [off, on, off]
        let script = [
            (&b, record(false, 1), SessionEvent::Waiting { ready: 0, known: 1 }),
            (&a, record(true, 2), SessionEvent::Waiting { ready: 1, known: 2 }),
            (&a, record(true, 3), SessionEvent::Waiting { ready: 1, known: 2 }),
            (&b, record(true, 4), SessionEvent::Started { vehicles: 2 }),
            (&a, record(false, 5), SessionEvent::Recorded),
            (&b, record(false, 6), SessionEvent::Finished),
        ];

        for (vehicle, record, expected) in script {
            assert_eq!(session.push(vehicle, record).unwrap(), expected);
        }
        assert!(session.is_finished());

        let sessions = session.into_sessions();
        let stamps = |s: &VehicleSession| -> Vec<u32> {
            s.records().iter().map(|r| r.timestamp_ms).collect()
        };
        assert_eq!(sessions[0].id(), &b);
        assert_eq!(stamps(&sessions[0]), [4, 6]);
        assert_eq!(sessions[1].id(), &a);
        assert_eq!(stamps(&sessions[1]), [2, 5]);
    }

    #[test]
    fn test_first_vehicle_active_starts_alone() {
        let a = VehicleId::from_port(5030);
        let b = VehicleId::from_port(5031);
        let mut session = RecordingSession::new();

        // A reports race on before B is known, so A alone is the ready set
        let script = [
            (&a, record(true, 1), SessionEvent::Started { vehicles: 1 }),
            (&b, record(false, 2), SessionEvent::Recorded),
            (&a, record(true, 3), SessionEvent::Recorded),
            (&b, record(true, 4), SessionEvent::Recorded),
            (&a, record(false, 5), SessionEvent::Recorded),
            (&b, record(false, 6), SessionEvent::Finished),
        ];

        for (vehicle, record, expected) in script {
            assert_eq!(session.push(vehicle, record).unwrap(), expected);
        }

        let sessions = session.into_sessions();
        let stamps = |s: &VehicleSession| -> Vec<u32> {
            s.records().iter().map(|r| r.timestamp_ms).collect()
        };
        assert_eq!(sessions[0].id(), &a);
        assert_eq!(stamps(&sessions[0]), [1, 3, 5]);
        assert_eq!(sessions[1].id(), &b);
        assert_eq!(stamps(&sessions[1]), [2, 4, 6]);
    }

    #[test]
    fn test_all_known_inactive_finishes() {
        let a = VehicleId::from_port(5030);
        let b = VehicleId::from_port(5031);
        let mut session = RecordingSession::new();

        session.push(&a, record(true, 1)).unwrap();
        assert_eq!(session.state(), SyncState::Recording);

        // b shows up after the start
        assert_eq!(
            session.push(&b, record(false, 2)).unwrap(),
            SessionEvent::Recorded
        );
        assert_eq!(
            session.push(&a, record(false, 3)).unwrap(),
            SessionEvent::Finished
        );
    }

    #[test]
    fn test_vehicle_that_stays_active_never_finishes() {
        let a = VehicleId::from_port(5030);
        let b = VehicleId::from_port(5031);
        let mut session = RecordingSession::new();

        session.push(&a, record(true, 1)).unwrap();
        session.push(&b, record(true, 2)).unwrap();
        session.push(&a, record(false, 3)).unwrap();
        for t in 4..20 {
            let event = session.push(&b, record(true, t)).unwrap();
            assert_ne!(event, SessionEvent::Finished);
        }
        assert!(!session.is_finished());
    }

    #[test]
    fn test_unreported_vehicle_does_not_gate_completion() {
        // B never sends a packet, so only A is known
        let a = VehicleId::from_port(5030);
        let mut session = RecordingSession::new();

        session.push(&a, record(true, 1)).unwrap();
        assert_eq!(
            session.push(&a, record(false, 2)).unwrap(),
            SessionEvent::Finished
        );
        assert_eq!(session.registry().len(), 1);
    }

    #[test]
    fn test_waiting_never_finishes() {
        let a = VehicleId::from_port(5030);
        let mut session = RecordingSession::new();

        for t in 0..5 {
            assert_eq!(
                session.push(&a, record(false, t)).unwrap(),
                SessionEvent::Waiting { ready: 0, known: 1 }
            );
        }
        assert!(!session.is_finished());
        assert!(session.registry().get(&a).unwrap().is_empty());
    }

    #[test]
    fn test_finish_can_be_undone_by_reactivation() {
        let a = VehicleId::from_port(5030);
        let mut session = RecordingSession::new();

        session.push(&a, record(true, 1)).unwrap();
        assert_eq!(
            session.push(&a, record(false, 2)).unwrap(),
            SessionEvent::Finished
        );
        assert_eq!(
            session.push(&a, record(true, 3)).unwrap(),
            SessionEvent::Recorded
        );
        assert!(!session.is_finished());
    }
}

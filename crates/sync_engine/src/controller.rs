//! Synchronization controller
//!
//! Session-level state machine gating which decoded records reach the
//! registry. Nothing is recorded until every known vehicle has reported
//! the race as on at least once; from then on every record is appended.

use std::collections::HashMap;

use contracts::{TelemetryRecord, VehicleId};
use tracing::{info, instrument, trace};

use crate::error::SyncError;
use crate::registry::VehicleRegistry;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Collecting first race-on records, nothing recorded yet
    WaitingForStart,
    /// Every record is appended to history
    Recording,
}

/// Per-vehicle readiness while waiting for the start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleReadiness {
    /// Never sent a packet
    Unknown,
    /// Seen, but only with the race off
    KnownNotReady,
    /// Seen with the race on; its first race-on record is held as seed
    KnownReady,
}

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// First race-on record of a vehicle, held as its seed
    Buffered,
    /// Not recorded (race off, or a later race-on record while waiting)
    Discarded,
    /// This record completed the ready set; seeds were flushed
    Started { vehicles: usize },
    /// Appended to history
    Appended,
}

#[derive(Debug)]
enum Slot {
    NotReady,
    Ready(Box<TelemetryRecord>),
}

#[derive(Debug)]
enum Phase {
    WaitingForStart { vehicles: HashMap<VehicleId, Slot> },
    Recording,
}

/// Start/stop gate for one recording run.
///
/// Owned by the ingestion loop; the write-once transition to
/// [`SyncState::Recording`] never reverts.
#[derive(Debug)]
pub struct SyncController {
    phase: Phase,
}

impl Default for SyncController {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncController {
    pub fn new() -> Self {
        Self {
            phase: Phase::WaitingForStart {
                vehicles: HashMap::new(),
            },
        }
    }

    pub fn state(&self) -> SyncState {
        match self.phase {
            Phase::WaitingForStart { .. } => SyncState::WaitingForStart,
            Phase::Recording => SyncState::Recording,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.phase, Phase::Recording)
    }

    /// Readiness of `vehicle`, or `None` once recording has started
    pub fn readiness(&self, vehicle: &VehicleId) -> Option<VehicleReadiness> {
        match &self.phase {
            Phase::WaitingForStart { vehicles } => Some(match vehicles.get(vehicle) {
                None => VehicleReadiness::Unknown,
                Some(Slot::NotReady) => VehicleReadiness::KnownNotReady,
                Some(Slot::Ready(_)) => VehicleReadiness::KnownReady,
            }),
            Phase::Recording => None,
        }
    }

    /// Vehicles that have reported race on (0 once recording)
    pub fn ready_count(&self) -> usize {
        match &self.phase {
            Phase::WaitingForStart { vehicles } => vehicles
                .values()
                .filter(|slot| matches!(slot, Slot::Ready(_)))
                .count(),
            Phase::Recording => 0,
        }
    }

    /// Vehicles seen while waiting (0 once recording)
    pub fn known_count(&self) -> usize {
        match &self.phase {
            Phase::WaitingForStart { vehicles } => vehicles.len(),
            Phase::Recording => 0,
        }
    }

    /// Gate one decoded record.
    ///
    /// The caller must have registered `vehicle` with
    /// [`VehicleRegistry::get_or_create`] first.
    #[instrument(
        level = "trace",
        name = "sync_controller_on_record",
        skip(self, record, registry),
        fields(vehicle = %vehicle, race_on = record.is_race_on)
    )]
    pub fn on_record(
        &mut self,
        vehicle: &VehicleId,
        record: TelemetryRecord,
        registry: &mut VehicleRegistry,
    ) -> Result<Gate, SyncError> {
        let vehicles = match &mut self.phase {
            Phase::Recording => {
                registry.append(vehicle, record)?;
                return Ok(Gate::Appended);
            }
            Phase::WaitingForStart { vehicles } => vehicles,
        };
        if !registry.contains(vehicle) {
            return Err(SyncError::UnknownVehicle {
                vehicle: vehicle.clone(),
            });
        }

        let slot = vehicles.entry(vehicle.clone()).or_insert(Slot::NotReady);
        match slot {
            Slot::NotReady if record.is_race_on => {
                trace!(vehicle = %vehicle, "first race-on record buffered");
                *slot = Slot::Ready(Box::new(record));
            }
            _ => return Ok(Gate::Discarded),
        }

        if !vehicles.values().all(|slot| matches!(slot, Slot::Ready(_))) {
            return Ok(Gate::Buffered);
        }

        let started = self.start(registry)?;
        Ok(Gate::Started { vehicles: started })
    }

    /// Flush every seed into its session and switch to recording
    fn start(&mut self, registry: &mut VehicleRegistry) -> Result<usize, SyncError> {
        // Every seed must have a session before the phase can flip
        if let Phase::WaitingForStart { vehicles } = &self.phase {
            if let Some(missing) = vehicles.keys().find(|v| !registry.contains(v)) {
                return Err(SyncError::UnknownVehicle {
                    vehicle: missing.clone(),
                });
            }
        }

        let Phase::WaitingForStart { vehicles } =
            std::mem::replace(&mut self.phase, Phase::Recording)
        else {
            return Ok(0);
        };

        let count = vehicles.len();
        for (vehicle, slot) in vehicles {
            if let Slot::Ready(seed) = slot {
                registry.append(&vehicle, *seed)?;
            }
        }

        metrics::counter!(observability::RECORDING_STARTED_TOTAL).increment(1);
        info!(vehicles = count, "all players reported race on, recording started");
        Ok(count)
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

    fn feed(
        controller: &mut SyncController,
        registry: &mut VehicleRegistry,
        vehicle: &VehicleId,
        record: TelemetryRecord,
    ) -> Gate {
        registry.get_or_create(vehicle);
        controller.on_record(vehicle, record, registry).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let controller = SyncController::new();
        assert_eq!(controller.state(), SyncState::WaitingForStart);
        assert_eq!(controller.known_count(), 0);
        assert_eq!(
            controller.readiness(&VehicleId::from_port(5030)),
            Some(VehicleReadiness::Unknown)
        );
    }

    #[test]
    fn test_inactive_vehicle_is_known_not_ready() {
        let mut controller = SyncController::new();
        let mut registry = VehicleRegistry::new();
        let a = VehicleId::from_port(5030);

        let gate = feed(&mut controller, &mut registry, &a, record(false, 1));
        assert_eq!(gate, Gate::Discarded);
        assert_eq!(
            controller.readiness(&a),
            Some(VehicleReadiness::KnownNotReady)
        );
        assert!(registry.get(&a).unwrap().is_empty());
    }

    #[test]
    fn test_only_first_active_record_is_seed() {
        let mut controller = SyncController::new();
        let mut registry = VehicleRegistry::new();
        let a = VehicleId::from_port(5030);
        let b = VehicleId::from_port(5031);

        feed(&mut controller, &mut registry, &b, record(false, 0));
        assert_eq!(
            feed(&mut controller, &mut registry, &a, record(true, 10)),
            Gate::Buffered
        );
        assert_eq!(
            feed(&mut controller, &mut registry, &a, record(true, 20)),
            Gate::Discarded
        );
        assert_eq!(controller.readiness(&a), Some(VehicleReadiness::KnownReady));

        assert_eq!(
            feed(&mut controller, &mut registry, &b, record(true, 30)),
            Gate::Started { vehicles: 2 }
        );
        let seed = &registry.get(&a).unwrap().records()[0];
        assert_eq!(seed.timestamp_ms, 10);
    }

    #[test]
    fn test_three_vehicles_start_with_one_seed_each() {
        let mut controller = SyncController::new();
        let mut registry = VehicleRegistry::new();
        let ids: Vec<_> = (5030..5033).map(VehicleId::from_port).collect();

        // Everyone is known before anyone is ready
        for id in &ids {
            feed(&mut controller, &mut registry, id, record(false, 0));
        }

        feed(&mut controller, &mut registry, &ids[0], record(true, 1));
        assert_eq!(controller.state(), SyncState::WaitingForStart);
        feed(&mut controller, &mut registry, &ids[1], record(true, 2));
        assert_eq!(controller.state(), SyncState::WaitingForStart);
        assert_eq!(controller.ready_count(), 2);
        assert_eq!(controller.known_count(), 3);
        assert!(registry.iter().all(|s| s.is_empty()));

        let gate = feed(&mut controller, &mut registry, &ids[2], record(true, 3));
        assert_eq!(gate, Gate::Started { vehicles: 3 });
        assert_eq!(controller.state(), SyncState::Recording);
        assert_eq!(controller.readiness(&ids[0]), None);

        for (i, id) in ids.iter().enumerate() {
            let session = registry.get(id).unwrap();
            assert_eq!(session.len(), 1);
            assert_eq!(session.records()[0].timestamp_ms, i as u32 + 1);
        }
    }

    #[test]
    fn test_single_vehicle_starts_immediately() {
        let mut controller = SyncController::new();
        let mut registry = VehicleRegistry::new();
        let a = VehicleId::from_port(5030);

        let gate = feed(&mut controller, &mut registry, &a, record(true, 1));
        assert_eq!(gate, Gate::Started { vehicles: 1 });
        assert_eq!(registry.get(&a).unwrap().len(), 1);
    }

    #[test]
    fn test_recording_appends_everything() {
        let mut controller = SyncController::new();
        let mut registry = VehicleRegistry::new();
        let a = VehicleId::from_port(5030);
        let late = VehicleId::from_port(5039);

        feed(&mut controller, &mut registry, &a, record(true, 1));
        assert_eq!(
            feed(&mut controller, &mut registry, &a, record(false, 2)),
            Gate::Appended
        );
        assert_eq!(
            feed(&mut controller, &mut registry, &late, record(false, 3)),
            Gate::Appended
        );

        assert_eq!(registry.get(&a).unwrap().len(), 2);
        assert_eq!(registry.get(&late).unwrap().len(), 1);
    }

    #[test]
    fn test_recording_append_requires_registration() {
        let mut controller = SyncController::new();
        let mut registry = VehicleRegistry::new();
        let a = VehicleId::from_port(5030);
        feed(&mut controller, &mut registry, &a, record(true, 1));

        let stranger = VehicleId::from_port(6000);
        let err = controller
            .on_record(&stranger, record(true, 2), &mut registry)
            .unwrap_err();
        assert_eq!(err, SyncError::UnknownVehicle { vehicle: stranger });
    }

    #[test]
    fn test_waiting_rejects_unregistered_vehicle() {
        let mut controller = SyncController::new();
        let mut registry = VehicleRegistry::new();
        let a = VehicleId::from_port(5030);

        let err = controller
            .on_record(&a, record(true, 1), &mut registry)
            .unwrap_err();
        assert_eq!(err, SyncError::UnknownVehicle { vehicle: a.clone() });
        assert_eq!(controller.readiness(&a), Some(VehicleReadiness::Unknown));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_start_keeps_waiting_and_flushes_nothing() {
        let mut controller = SyncController::new();
        let mut original = VehicleRegistry::new();
        let a = VehicleId::from_port(5030);
        let b = VehicleId::from_port(5031);

        feed(&mut controller, &mut original, &a, record(true, 1));
        feed(&mut controller, &mut original, &b, record(false, 2));

        // A registry that knows b but not a cannot take a's seed
        let mut other = VehicleRegistry::new();
        other.get_or_create(&b);
        let err = controller
            .on_record(&b, record(true, 3), &mut other)
            .unwrap_err();
        assert_eq!(err, SyncError::UnknownVehicle { vehicle: a.clone() });
        assert_eq!(controller.state(), SyncState::WaitingForStart);
        assert!(other.get(&b).unwrap().is_empty());
        assert_eq!(controller.readiness(&a), Some(VehicleReadiness::KnownReady));
    }
}

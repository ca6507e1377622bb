//! Vehicle registry
//!
//! Maps a vehicle id to its accumulated history. Sessions are created on
//! first sighting and live until the run ends; nothing is ever removed.

use std::collections::HashMap;

use contracts::{TelemetryRecord, VehicleId, VehicleSession};
use tracing::info;

use crate::error::SyncError;

#[derive(Debug, Default)]
pub struct VehicleRegistry {
    sessions: HashMap<VehicleId, VehicleSession>,
    /// First-seen order, for stable iteration and export
    order: Vec<VehicleId>,
}

impl VehicleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `id`, creating it on first call.
    pub fn get_or_create(&mut self, id: &VehicleId) -> &mut VehicleSession {
        if !self.sessions.contains_key(id) {
            info!(vehicle = %id, name = %id.display_name(), "new vehicle detected");
            self.order.push(id.clone());
            metrics::gauge!(observability::VEHICLES).set(self.order.len() as f64);
        }
        self.sessions
            .entry(id.clone())
            .or_insert_with(|| VehicleSession::new(id.clone()))
    }

    /// Append to an existing session
    pub fn append(&mut self, id: &VehicleId, record: TelemetryRecord) -> Result<(), SyncError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SyncError::UnknownVehicle { vehicle: id.clone() })?;
        session.push(record);
        Ok(())
    }

    pub fn get(&self, id: &VehicleId) -> Option<&VehicleSession> {
        self.sessions.get(id)
    }

    pub fn contains(&self, id: &VehicleId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Sessions in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &VehicleSession> {
        self.order.iter().filter_map(|id| self.sessions.get(id))
    }

    /// True when at least one vehicle is registered and every vehicle's
    /// latest record reports the race as off.
    ///
    /// A registered vehicle with no history yet is not finished.
    pub fn is_finished(&self) -> bool {
        !self.sessions.is_empty()
            && self
                .sessions
                .values()
                .all(|s| s.last().is_some_and(|r| !r.is_race_on))
    }

    /// Consume the registry, yielding sessions in first-seen order
    pub fn into_sessions(mut self) -> Vec<VehicleSession> {
        self.order
            .iter()
            .filter_map(|id| self.sessions.remove(id))
            .collect()
    }
}

//! VehicleSession - accumulated history of one vehicle

use serde::Serialize;

use crate::{TelemetryRecord, VehicleId};

/// Append-only, chronological history for one vehicle.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleSession {
    id: VehicleId,
    name: String,
    records: Vec<TelemetryRecord>,
}

impl VehicleSession {
    /// Create an empty session; the display name derives from the id
    pub fn new(id: VehicleId) -> Self {
        let name = id.display_name();
        Self {
            id,
            name,
            records: Vec::new(),
        }
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record, if any
    pub fn last(&self) -> Option<&TelemetryRecord> {
        self.records.last()
    }

    pub fn push(&mut self, record: TelemetryRecord) {
        self.records.push(record);
    }
}

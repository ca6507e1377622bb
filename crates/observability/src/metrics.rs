//! Recorder metrics
//!
//! Metric names used across the workspace, plus an in-memory aggregator
//! for the summary printed when a run ends.

use std::collections::HashMap;

use contracts::{TelemetryRecord, VehicleId};
use metrics::{counter, describe_counter, describe_gauge, Unit};

pub const PACKETS_RECEIVED_TOTAL: &str = "forza_recorder_packets_received_total";
pub const DECODE_ERRORS_TOTAL: &str = "forza_recorder_decode_errors_total";
pub const RECORDS_APPENDED_TOTAL: &str = "forza_recorder_records_appended_total";
pub const RECORDING_STARTED_TOTAL: &str = "forza_recorder_recording_started_total";
pub const VEHICLES: &str = "forza_recorder_vehicles";
pub const EXPORTS_TOTAL: &str = "forza_recorder_exports_total";

/// Register descriptions with the installed recorder
pub fn describe_metrics() {
    describe_counter!(PACKETS_RECEIVED_TOTAL, Unit::Count, "Datagrams received per vehicle");
    describe_counter!(DECODE_ERRORS_TOTAL, Unit::Count, "Packets dropped by the decoder");
    describe_counter!(
        RECORDS_APPENDED_TOTAL,
        Unit::Count,
        "Records appended to a vehicle history while recording"
    );
    describe_counter!(
        RECORDING_STARTED_TOTAL,
        Unit::Count,
        "Transitions into the recording phase"
    );
    describe_gauge!(VEHICLES, Unit::Count, "Vehicles seen so far");
    describe_counter!(EXPORTS_TOTAL, Unit::Count, "Exports by exporter and status");
}

/// Record a packet the decoder rejected
pub fn record_decode_error(vehicle: &VehicleId) {
    counter!(DECODE_ERRORS_TOTAL, "vehicle" => vehicle.to_string()).increment(1);
}

/// Per-vehicle statistics for the run summary
#[derive(Debug, Clone, Default)]
struct VehicleStats {
    records: u64,
    race_on: u64,
    speed_kph: RunningStats,
    last_lap: u16,
}

/// In-memory aggregator of decoded records, keyed by vehicle.
#[derive(Debug, Clone, Default)]
pub struct RecordingStatsAggregator {
    vehicles: HashMap<VehicleId, VehicleStats>,
    order: Vec<VehicleId>,
    decode_errors: u64,
}

impl RecordingStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account one decoded record
    pub fn update(&mut self, vehicle: &VehicleId, record: &TelemetryRecord) {
        let stats = match self.vehicles.get_mut(vehicle) {
            Some(stats) => stats,
            None => {
                self.order.push(vehicle.clone());
                self.vehicles.entry(vehicle.clone()).or_default()
            }
        };

        stats.records += 1;
        if record.is_race_on {
            stats.race_on += 1;
            stats.speed_kph.push(record.speed_kph);
        }
        stats.last_lap = stats.last_lap.max(record.lap_number);
    }

    /// Account one rejected packet
    pub fn record_decode_error(&mut self) {
        self.decode_errors += 1;
    }

    pub fn summary(&self) -> RecordingSummary {
        RecordingSummary {
            decode_errors: self.decode_errors,
            vehicles: self
                .order
                .iter()
                .filter_map(|id| self.vehicles.get(id).map(|s| (id, s)))
                .map(|(id, s)| VehicleSummary {
                    name: id.display_name(),
                    records: s.records,
                    race_on: s.race_on,
                    laps: s.last_lap,
                    speed_kph: StatsSummary::from(&s.speed_kph),
                })
                .collect(),
        }
    }
}

/// Summary of one vehicle's decoded records
#[derive(Debug, Clone, Default)]
pub struct VehicleSummary {
    pub name: String,
    pub records: u64,
    pub race_on: u64,
    pub laps: u16,
    pub speed_kph: StatsSummary,
}

/// Run summary
#[derive(Debug, Clone, Default)]
pub struct RecordingSummary {
    pub decode_errors: u64,
    pub vehicles: Vec<VehicleSummary>,
}

impl std::fmt::Display for RecordingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Recording Summary ===")?;
        writeln!(f, "Vehicles: {}", self.vehicles.len())?;
        writeln!(f, "Decode errors: {}", self.decode_errors)?;
        for v in &self.vehicles {
            writeln!(
                f,
                "  {}: {} packets ({} race on), laps={}, speed kph {}",
                v.name, v.records, v.race_on, v.laps, v.speed_kph
            )?;
        }
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.1}, max={:.1}, mean={:.1}, std={:.1} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

//! CsvExporter - one CSV file per vehicle

use contracts::{ContractError, TelemetryExporter, TelemetryRecord, VehicleSession};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

/// Column names, in row order
pub const CSV_HEADER: [&str; 88] = [
    "timestamp",
    "isRaceOn",
    "timestampMS",
    "engine_max_rpm",
    "engine_idle_rpm",
    "engine_current_rpm",
    "accel_x",
    "accel_y",
    "accel_z",
    "vel_x",
    "vel_y",
    "vel_z",
    "ang_vel_x",
    "ang_vel_y",
    "ang_vel_z",
    "yaw",
    "pitch",
    "roll",
    "norm_susp_fl",
    "norm_susp_fr",
    "norm_susp_rl",
    "norm_susp_rr",
    "tire_slip_fl",
    "tire_slip_fr",
    "tire_slip_rl",
    "tire_slip_rr",
    "wheel_rot_fl",
    "wheel_rot_fr",
    "wheel_rot_rl",
    "wheel_rot_rr",
    "wheel_on_rumble_fl",
    "wheel_on_rumble_fr",
    "wheel_on_rumble_rl",
    "wheel_on_rumble_rr",
    "wheel_in_puddle_fl",
    "wheel_in_puddle_fr",
    "wheel_in_puddle_rl",
    "wheel_in_puddle_rr",
    "surface_rumble_fl",
    "surface_rumble_fr",
    "surface_rumble_rl",
    "surface_rumble_rr",
    "tire_slip_angle_fl",
    "tire_slip_angle_fr",
    "tire_slip_angle_rl",
    "tire_slip_angle_rr",
    "tire_combined_slip_fl",
    "tire_combined_slip_fr",
    "tire_combined_slip_rl",
    "tire_combined_slip_rr",
    "susp_travel_fl",
    "susp_travel_fr",
    "susp_travel_rl",
    "susp_travel_rr",
    "car_ordinal",
    "car_class",
    "car_performance_index",
    "drivetrain_type",
    "num_cylinders",
    "pos_x",
    "pos_y",
    "pos_z",
    "speed_mps",
    "speed_kph",
    "speed_mph",
    "power",
    "torque",
    "tire_temp_fl",
    "tire_temp_fr",
    "tire_temp_rl",
    "tire_temp_rr",
    "boost",
    "fuel",
    "distance",
    "best_lap",
    "last_lap",
    "current_lap",
    "current_race_time",
    "lap_number",
    "race_position",
    "accel",
    "brake",
    "clutch",
    "handbrake",
    "gear",
    "steer",
    "norm_driving_line",
    "norm_ai_brake_diff",
];

/// Configuration for CsvExporter
#[derive(Debug, Clone)]
pub struct CsvExporterConfig {
    /// Directory the files are written into
    pub output_dir: PathBuf,
}

impl CsvExporterConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let output_dir = params
            .get("output_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self { output_dir }
    }
}

/// Exporter that writes `<display name>.csv` per vehicle
pub struct CsvExporter {
    name: String,
    config: CsvExporterConfig,
    written: Vec<PathBuf>,
}

impl CsvExporter {
    /// Create a new CsvExporter, creating the output directory if needed
    pub fn new(name: impl Into<String>, config: CsvExporterConfig) -> std::io::Result<Self> {
        fs::create_dir_all(&config.output_dir)?;

        Ok(Self {
            name: name.into(),
            config,
            written: Vec::new(),
        })
    }

    /// Create from params map (for factory)
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> std::io::Result<Self> {
        Self::new(name, CsvExporterConfig::from_params(params))
    }

    /// Path a session is written to
    pub fn path_for(&self, session: &VehicleSession) -> PathBuf {
        self.config.output_dir.join(format!("{}.csv", session.name()))
    }

    /// Files written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_file(path: &Path, session: &VehicleSession) -> std::io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);

        writeln!(out, "{}", CSV_HEADER.join(","))?;
        for record in session.records() {
            writeln!(out, "{}", row(record).join(","))?;
        }

        out.flush()
    }
}

/// Render one record as CSV fields
fn row(r: &TelemetryRecord) -> Vec<String> {
    let mut fields = Vec::with_capacity(CSV_HEADER.len());

    fields.push(r.timestamp_rfc3339());
    fields.push(r.is_race_on.to_string());
    fields.push(r.timestamp_ms.to_string());

    let mut floats = |values: &[f64]| fields.extend(values.iter().map(f64::to_string));
    floats(&[r.engine_max_rpm, r.engine_idle_rpm, r.engine_current_rpm]);
    for v in [r.acceleration, r.velocity, r.angular_velocity] {
        floats(&[v.x, v.y, v.z]);
    }
    floats(&[r.yaw, r.pitch, r.roll]);
    for w in [
        r.normalized_suspension_travel,
        r.tire_slip_ratio,
        r.wheel_rotation_speed,
        r.wheel_on_rumble_strip,
        r.wheel_in_puddle_depth,
        r.surface_rumble,
        r.tire_slip_angle,
        r.tire_combined_slip,
        r.suspension_travel,
    ] {
        floats(&w.to_array());
    }

    fields.extend(
        [
            r.car_ordinal,
            r.car_class,
            r.car_performance_index,
            r.drivetrain_type,
            r.num_cylinders,
        ]
        .iter()
        .map(i32::to_string),
    );

    let mut floats = |values: &[f64]| fields.extend(values.iter().map(f64::to_string));
    floats(&[r.position.x, r.position.y, r.position.z]);
    floats(&[r.speed_mps, r.speed_kph, r.speed_mph, r.power, r.torque]);
    floats(&r.tire_temp.to_array());
    floats(&[
        r.boost,
        r.fuel,
        r.distance_traveled,
        r.best_lap,
        r.last_lap,
        r.current_lap,
        r.current_race_time,
    ]);

    fields.push(r.lap_number.to_string());
    fields.push(r.race_position.to_string());
    for v in [r.accel, r.brake, r.clutch, r.handbrake, r.gear] {
        fields.push(v.to_string());
    }
    for v in [
        r.steer,
        r.normalized_driving_line,
        r.normalized_ai_brake_difference,
    ] {
        fields.push(v.to_string());
    }

    fields
}

impl TelemetryExporter for CsvExporter {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "csv_exporter_export",
        skip(self, session),
        fields(exporter = %self.name, vehicle = %session.id(), records = session.len())
    )]
    async fn export(&mut self, session: &VehicleSession) -> Result<(), ContractError> {
        let path = self.path_for(session);
        Self::write_file(&path, session).map_err(|e| {
            error!(exporter = %self.name, path = %path.display(), error = %e, "write failed");
            ContractError::export(&self.name, session.id().as_str(), e.to_string())
        })?;

        info!(path = %path.display(), records = session.len(), "wrote CSV");
        self.written.push(path);
        Ok(())
    }

    #[instrument(name = "csv_exporter_close", skip(self))]
    async fn close(&mut self) -> Result<(), ContractError> {
        debug!(exporter = %self.name, files = self.written.len(), "CsvExporter closed");
        Ok(())
    }
}

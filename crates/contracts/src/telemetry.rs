//! TelemetryRecord - decoder output
//!
//! One decoded telemetry packet. Field order mirrors the wire layout.

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};

/// 3D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// One value per wheel: front-left, front-right, rear-left, rear-right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Wheels<T> {
    pub fl: T,
    pub fr: T,
    pub rl: T,
    pub rr: T,
}

impl<T: Copy> Wheels<T> {
    pub fn new(fl: T, fr: T, rl: T, rr: T) -> Self {
        Self { fl, fr, rl, rr }
    }

    /// Values in FL, FR, RL, RR order
    pub fn to_array(&self) -> [T; 4] {
        [self.fl, self.fr, self.rl, self.rr]
    }
}

/// A decoded vehicle-state snapshot.
///
/// Immutable once constructed. Floats come off the wire as `f32` and are
/// widened to `f64`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// Wall-clock capture time, assigned by the decoder
    pub captured_at: DateTime<Local>,

    /// Race in progress for this vehicle
    pub is_race_on: bool,

    /// Game-side timestamp in milliseconds (wraps)
    pub timestamp_ms: u32,

    // ===== Engine =====
    pub engine_max_rpm: f64,
    pub engine_idle_rpm: f64,
    pub engine_current_rpm: f64,

    // ===== Motion (car-local space) =====
    pub acceleration: Vector3,
    pub velocity: Vector3,
    pub angular_velocity: Vector3,
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,

    // ===== Per-wheel =====
    /// 0.0 = max stretch, 1.0 = max compression
    pub normalized_suspension_travel: Wheels<f64>,
    pub tire_slip_ratio: Wheels<f64>,
    /// Radians per second
    pub wheel_rotation_speed: Wheels<f64>,
    pub wheel_on_rumble_strip: Wheels<f64>,
    pub wheel_in_puddle_depth: Wheels<f64>,
    pub surface_rumble: Wheels<f64>,
    pub tire_slip_angle: Wheels<f64>,
    pub tire_combined_slip: Wheels<f64>,
    /// Meters
    pub suspension_travel: Wheels<f64>,

    // ===== Car identity =====
    pub car_ordinal: i32,
    pub car_class: i32,
    pub car_performance_index: i32,
    pub drivetrain_type: i32,
    pub num_cylinders: i32,

    // ===== Dash =====
    pub position: Vector3,
    pub speed_mps: f64,
    pub speed_kph: f64,
    pub speed_mph: f64,
    pub power: f64,
    pub torque: f64,
    pub tire_temp: Wheels<f64>,
    pub boost: f64,
    pub fuel: f64,
    pub distance_traveled: f64,
    pub best_lap: f64,
    pub last_lap: f64,
    pub current_lap: f64,
    pub current_race_time: f64,
    pub lap_number: u16,
    pub race_position: u8,

    // ===== Driver inputs =====
    pub accel: u8,
    pub brake: u8,
    pub clutch: u8,
    pub handbrake: u8,
    pub gear: u8,
    pub steer: i8,
    pub normalized_driving_line: i8,
    pub normalized_ai_brake_difference: i8,
}

impl TelemetryRecord {
    /// Capture time as sortable RFC 3339 text with offset and nanoseconds
    pub fn timestamp_rfc3339(&self) -> String {
        self.captured_at
            .to_rfc3339_opts(SecondsFormat::Nanos, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_norm() {
        assert_eq!(Vector3::new(3.0, 4.0, 0.0).norm(), 5.0);
        assert_eq!(Vector3::default().norm(), 0.0);
    }

    #[test]
    fn test_wheels_order() {
        let w = Wheels::new(1, 2, 3, 4);
        assert_eq!(w.to_array(), [1, 2, 3, 4]);
    }
}

//! Telemetry packet decoder
//!
//! The dash wire format carries a 12-byte legacy region at [232, 244).
//! Decoding first splices that region out, producing a 311-byte working
//! buffer; every field offset below is relative to that buffer, not to
//! the datagram.
//!
//! All fields are little-endian.

use chrono::{DateTime, Local};
use contracts::{TelemetryRecord, Vector3, Wheels};

use crate::error::DecodeError;

/// Smallest datagram the decoder accepts
pub const MIN_PACKET_LEN: usize = 323;
/// Length of the working buffer after the splice
pub const PATCHED_LEN: usize = 311;

pub(crate) const GAP_START: usize = 232;
pub(crate) const GAP_END: usize = 244;
pub(crate) const GAP_LEN: usize = GAP_END - GAP_START;

const MPS_TO_KPH: f64 = 3.6;
const MPS_TO_MPH: f64 = 2.23694;

// ── Offsets into the spliced buffer ─────────────────────────────────────────
pub(crate) const OFF_IS_RACE_ON: usize = 0; // i32
pub(crate) const OFF_TIMESTAMP_MS: usize = 4; // u32
pub(crate) const OFF_ENGINE_MAX_RPM: usize = 8;
pub(crate) const OFF_ENGINE_IDLE_RPM: usize = 12;
pub(crate) const OFF_ENGINE_CURRENT_RPM: usize = 16;
pub(crate) const OFF_ACCELERATION: usize = 20; // 3 × f32
pub(crate) const OFF_VELOCITY: usize = 32; // 3 × f32
pub(crate) const OFF_ANGULAR_VELOCITY: usize = 44; // 3 × f32
pub(crate) const OFF_YAW: usize = 56;
pub(crate) const OFF_PITCH: usize = 60;
pub(crate) const OFF_ROLL: usize = 64;
pub(crate) const OFF_NORM_SUSPENSION: usize = 68; // 4 × f32, FL FR RL RR
pub(crate) const OFF_TIRE_SLIP_RATIO: usize = 84;
pub(crate) const OFF_WHEEL_ROTATION: usize = 100;
pub(crate) const OFF_WHEEL_ON_RUMBLE: usize = 116;
pub(crate) const OFF_WHEEL_IN_PUDDLE: usize = 132;
pub(crate) const OFF_SURFACE_RUMBLE: usize = 148;
pub(crate) const OFF_TIRE_SLIP_ANGLE: usize = 164;
pub(crate) const OFF_TIRE_COMBINED_SLIP: usize = 180;
pub(crate) const OFF_SUSPENSION_TRAVEL: usize = 196;
pub(crate) const OFF_CAR_ORDINAL: usize = 212; // i32
pub(crate) const OFF_CAR_CLASS: usize = 216; // i32
pub(crate) const OFF_CAR_PI: usize = 220; // i32
pub(crate) const OFF_DRIVETRAIN: usize = 224; // i32
pub(crate) const OFF_NUM_CYLINDERS: usize = 228; // i32
pub(crate) const OFF_POSITION: usize = 232; // 3 × f32
pub(crate) const OFF_SPEED: usize = 244; // f32 m/s
pub(crate) const OFF_POWER: usize = 248;
pub(crate) const OFF_TORQUE: usize = 252;
pub(crate) const OFF_TIRE_TEMP: usize = 256; // 4 × f32
pub(crate) const OFF_BOOST: usize = 272;
pub(crate) const OFF_FUEL: usize = 276;
pub(crate) const OFF_DISTANCE: usize = 280;
pub(crate) const OFF_BEST_LAP: usize = 284;
pub(crate) const OFF_LAST_LAP: usize = 288;
pub(crate) const OFF_CURRENT_LAP: usize = 292;
pub(crate) const OFF_CURRENT_RACE_TIME: usize = 296;
pub(crate) const OFF_LAP_NUMBER: usize = 300; // u16
pub(crate) const OFF_RACE_POSITION: usize = 302; // u8
pub(crate) const OFF_ACCEL: usize = 303; // u8
pub(crate) const OFF_BRAKE: usize = 304; // u8
pub(crate) const OFF_CLUTCH: usize = 305; // u8
pub(crate) const OFF_HANDBRAKE: usize = 306; // u8
pub(crate) const OFF_GEAR: usize = 307; // u8
pub(crate) const OFF_STEER: usize = 308; // i8
pub(crate) const OFF_DRIVING_LINE: usize = 309; // i8
pub(crate) const OFF_AI_BRAKE_DIFF: usize = 310; // i8

/// Map a spliced-buffer offset back to its position in the datagram
pub(crate) const fn wire_offset(patched: usize) -> usize {
    if patched < GAP_START {
        patched
    } else {
        patched + GAP_LEN
    }
}

/// Decode a datagram, stamping it with the current wall-clock time.
///
/// # Errors
/// [`DecodeError::PacketTooShort`] when `data` is under
/// [`MIN_PACKET_LEN`] bytes. No partial record is ever produced.
pub fn decode(data: &[u8]) -> Result<TelemetryRecord, DecodeError> {
    decode_at(data, Local::now())
}

/// Decode a datagram with an explicit capture time.
pub fn decode_at(
    data: &[u8],
    captured_at: DateTime<Local>,
) -> Result<TelemetryRecord, DecodeError> {
    let buf = PatchedBuffer::splice(data)?;

    let velocity = buf.vector3(OFF_VELOCITY);
    // Some titles leave the scalar at zero; fall back to |velocity|
    let mut speed_mps = buf.f32(OFF_SPEED);
    if speed_mps == 0.0 {
        speed_mps = velocity.norm();
    }

    Ok(TelemetryRecord {
        captured_at,
        is_race_on: buf.i32(OFF_IS_RACE_ON) != 0,
        timestamp_ms: buf.u32(OFF_TIMESTAMP_MS),
        engine_max_rpm: buf.f32(OFF_ENGINE_MAX_RPM),
        engine_idle_rpm: buf.f32(OFF_ENGINE_IDLE_RPM),
        engine_current_rpm: buf.f32(OFF_ENGINE_CURRENT_RPM),
        acceleration: buf.vector3(OFF_ACCELERATION),
        velocity,
        angular_velocity: buf.vector3(OFF_ANGULAR_VELOCITY),
        yaw: buf.f32(OFF_YAW),
        pitch: buf.f32(OFF_PITCH),
        roll: buf.f32(OFF_ROLL),
        normalized_suspension_travel: buf.wheels(OFF_NORM_SUSPENSION),
        tire_slip_ratio: buf.wheels(OFF_TIRE_SLIP_RATIO),
        wheel_rotation_speed: buf.wheels(OFF_WHEEL_ROTATION),
        wheel_on_rumble_strip: buf.wheels(OFF_WHEEL_ON_RUMBLE),
        wheel_in_puddle_depth: buf.wheels(OFF_WHEEL_IN_PUDDLE),
        surface_rumble: buf.wheels(OFF_SURFACE_RUMBLE),
        tire_slip_angle: buf.wheels(OFF_TIRE_SLIP_ANGLE),
        tire_combined_slip: buf.wheels(OFF_TIRE_COMBINED_SLIP),
        suspension_travel: buf.wheels(OFF_SUSPENSION_TRAVEL),
        car_ordinal: buf.i32(OFF_CAR_ORDINAL),
        car_class: buf.i32(OFF_CAR_CLASS),
        car_performance_index: buf.i32(OFF_CAR_PI),
        drivetrain_type: buf.i32(OFF_DRIVETRAIN),
        num_cylinders: buf.i32(OFF_NUM_CYLINDERS),
        position: buf.vector3(OFF_POSITION),
        speed_mps,
        speed_kph: speed_mps * MPS_TO_KPH,
        speed_mph: speed_mps * MPS_TO_MPH,
        power: buf.f32(OFF_POWER),
        torque: buf.f32(OFF_TORQUE),
        tire_temp: buf.wheels(OFF_TIRE_TEMP),
        boost: buf.f32(OFF_BOOST),
        fuel: buf.f32(OFF_FUEL),
        distance_traveled: buf.f32(OFF_DISTANCE),
        best_lap: buf.f32(OFF_BEST_LAP),
        last_lap: buf.f32(OFF_LAST_LAP),
        current_lap: buf.f32(OFF_CURRENT_LAP),
        current_race_time: buf.f32(OFF_CURRENT_RACE_TIME),
        lap_number: buf.u16(OFF_LAP_NUMBER),
        race_position: buf.u8(OFF_RACE_POSITION),
        accel: buf.u8(OFF_ACCEL),
        brake: buf.u8(OFF_BRAKE),
        clutch: buf.u8(OFF_CLUTCH),
        handbrake: buf.u8(OFF_HANDBRAKE),
        gear: buf.u8(OFF_GEAR),
        steer: buf.i8(OFF_STEER),
        normalized_driving_line: buf.i8(OFF_DRIVING_LINE),
        normalized_ai_brake_difference: buf.i8(OFF_AI_BRAKE_DIFF),
    })
}

/// Working buffer: datagram[0..232] followed by datagram[244..323].
struct PatchedBuffer([u8; PATCHED_LEN]);

impl PatchedBuffer {
    fn splice(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < MIN_PACKET_LEN {
            return Err(DecodeError::PacketTooShort {
                len: data.len(),
                required: MIN_PACKET_LEN,
            });
        }

        let mut buf = [0u8; PATCHED_LEN];
        buf[..GAP_START].copy_from_slice(&data[..GAP_START]);
        buf[GAP_START..].copy_from_slice(&data[GAP_END..MIN_PACKET_LEN]);
        Ok(Self(buf))
    }

    fn bytes4(&self, off: usize) -> [u8; 4] {
        let b = &self.0;
        [b[off], b[off + 1], b[off + 2], b[off + 3]]
    }

    fn f32(&self, off: usize) -> f64 {
        f64::from(f32::from_le_bytes(self.bytes4(off)))
    }

    fn i32(&self, off: usize) -> i32 {
        i32::from_le_bytes(self.bytes4(off))
    }

    fn u32(&self, off: usize) -> u32 {
        u32::from_le_bytes(self.bytes4(off))
    }

    fn u16(&self, off: usize) -> u16 {
        u16::from_le_bytes([self.0[off], self.0[off + 1]])
    }

    fn u8(&self, off: usize) -> u8 {
        self.0[off]
    }

    fn i8(&self, off: usize) -> i8 {
        i8::from_le_bytes([self.0[off]])
    }

    fn vector3(&self, off: usize) -> Vector3 {
        Vector3::new(self.f32(off), self.f32(off + 4), self.f32(off + 8))
    }

    fn wheels(&self, off: usize) -> Wheels<f64> {
        Wheels::new(
            self.f32(off),
            self.f32(off + 4),
            self.f32(off + 8),
            self.f32(off + 12),
        )
    }
}

//! Mock telemetry source
//!
//! Builds synthetic dash-format datagrams and plays them to UDP ports,
//! for tests and demos without a running simulation.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tracing::{debug, trace};

use crate::decoder::{
    wire_offset, OFF_ACCEL, OFF_BRAKE, OFF_CURRENT_LAP, OFF_CURRENT_RACE_TIME,
    OFF_DISTANCE, OFF_ENGINE_CURRENT_RPM, OFF_ENGINE_IDLE_RPM, OFF_ENGINE_MAX_RPM, OFF_FUEL,
    OFF_GEAR, OFF_IS_RACE_ON, OFF_LAP_NUMBER, OFF_POSITION, OFF_RACE_POSITION, OFF_SPEED,
    OFF_STEER, OFF_TIMESTAMP_MS, OFF_VELOCITY,
};

/// Datagram length of the dash format as sent by the simulation
pub const WIRE_PACKET_LEN: usize = 324;

/// Builder for one wire-format telemetry datagram.
///
/// Setters take values in wire units and write them at their datagram
/// offsets (fields after the legacy region land 12 bytes later).
#[derive(Debug, Clone)]
pub struct MockPacket {
    data: Vec<u8>,
}

impl Default for MockPacket {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPacket {
    /// All-zero packet with the race flag off
    pub fn new() -> Self {
        Self {
            data: vec![0u8; WIRE_PACKET_LEN],
        }
    }

    /// Plausible mid-race packet for a given tick
    pub fn driving(race_on: bool, tick: u32) -> Self {
        let t = tick as f32 * 0.016;
        let speed = 20.0 + (t * 0.5).sin() * 5.0;
        Self::new()
            .race_on(race_on)
            .timestamp_ms(tick.wrapping_mul(16))
            .engine_rpm(8000.0, 900.0, 3000.0 + speed * 100.0)
            .velocity(0.0, 0.0, speed)
            .speed(speed)
            .position(t.cos() * 100.0, 0.0, t.sin() * 100.0)
            .race_time(t, t, 1)
            .gear(3)
            .pedals(200, 0)
    }

    pub fn race_on(self, on: bool) -> Self {
        self.put_i32(OFF_IS_RACE_ON, i32::from(on))
    }

    pub fn timestamp_ms(self, ms: u32) -> Self {
        self.put_bytes(OFF_TIMESTAMP_MS, &ms.to_le_bytes())
    }

    pub fn engine_rpm(self, max: f32, idle: f32, current: f32) -> Self {
        self.put_f32(OFF_ENGINE_MAX_RPM, max)
            .put_f32(OFF_ENGINE_IDLE_RPM, idle)
            .put_f32(OFF_ENGINE_CURRENT_RPM, current)
    }

    pub fn velocity(self, x: f32, y: f32, z: f32) -> Self {
        self.put_f32(OFF_VELOCITY, x)
            .put_f32(OFF_VELOCITY + 4, y)
            .put_f32(OFF_VELOCITY + 8, z)
    }

    pub fn position(self, x: f32, y: f32, z: f32) -> Self {
        self.put_f32(OFF_POSITION, x)
            .put_f32(OFF_POSITION + 4, y)
            .put_f32(OFF_POSITION + 8, z)
    }

    /// Reported scalar speed in m/s
    pub fn speed(self, mps: f32) -> Self {
        self.put_f32(OFF_SPEED, mps)
    }

    pub fn fuel(self, fuel: f32) -> Self {
        self.put_f32(OFF_FUEL, fuel)
    }

    pub fn distance(self, meters: f32) -> Self {
        self.put_f32(OFF_DISTANCE, meters)
    }

    /// Current lap time, total race time and lap number
    pub fn race_time(self, current_lap: f32, race_time: f32, lap: u16) -> Self {
        self.put_f32(OFF_CURRENT_LAP, current_lap)
            .put_f32(OFF_CURRENT_RACE_TIME, race_time)
            .put_bytes(OFF_LAP_NUMBER, &lap.to_le_bytes())
    }

    pub fn race_position(self, position: u8) -> Self {
        self.put_bytes(OFF_RACE_POSITION, &[position])
    }

    pub fn gear(self, gear: u8) -> Self {
        self.put_bytes(OFF_GEAR, &[gear])
    }

    pub fn steer(self, steer: i8) -> Self {
        self.put_bytes(OFF_STEER, &steer.to_le_bytes())
    }

    pub fn pedals(self, accel: u8, brake: u8) -> Self {
        self.put_bytes(OFF_ACCEL, &[accel]).put_bytes(OFF_BRAKE, &[brake])
    }

    /// Finished datagram
    pub fn build(self) -> Vec<u8> {
        self.data
    }

    fn put_f32(self, patched: usize, value: f32) -> Self {
        self.put_bytes(patched, &value.to_le_bytes())
    }

    fn put_i32(self, patched: usize, value: i32) -> Self {
        self.put_bytes(patched, &value.to_le_bytes())
    }

    fn put_bytes(mut self, patched: usize, bytes: &[u8]) -> Self {
        let off = wire_offset(patched);
        self.data[off..off + bytes.len()].copy_from_slice(bytes);
        self
    }
}

/// Plays scripted datagrams to listener ports over UDP.
pub struct MockSimulator {
    socket: UdpSocket,
}

impl MockSimulator {
    /// Bind an ephemeral local socket
    pub async fn bind() -> std::io::Result<Self> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        Ok(Self { socket })
    }

    /// Send one datagram
    pub async fn send(&self, target: SocketAddr, packet: &[u8]) -> std::io::Result<()> {
        self.socket.send_to(packet, target).await?;
        trace!(%target, len = packet.len(), "mock packet sent");
        Ok(())
    }

    /// Send every packet in order with `interval` between them.
    ///
    /// Returns the number of datagrams sent.
    pub async fn play(
        &self,
        target: SocketAddr,
        packets: &[Vec<u8>],
        interval: Duration,
    ) -> std::io::Result<usize> {
        debug!(%target, count = packets.len(), "mock simulator playing script");
        for packet in packets {
            self.send(target, packet).await?;
            if !interval.is_zero() {
                tokio::time::sleep(interval).await;
            }
        }
        Ok(packets.len())
    }
}

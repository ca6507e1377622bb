//! RawPacket - Listener output
//!
//! One datagram as received, before decoding.

use bytes::Bytes;

use crate::VehicleId;

/// A raw datagram tagged with the vehicle whose listener received it.
#[derive(Debug, Clone)]
pub struct RawPacket {
    /// Identifier derived from the receiving listener's port
    pub vehicle_id: VehicleId,

    /// Datagram payload as received
    pub payload: Bytes,
}

impl RawPacket {
    pub fn new(vehicle_id: VehicleId, payload: impl Into<Bytes>) -> Self {
        Self {
            vehicle_id,
            payload: payload.into(),
        }
    }
}

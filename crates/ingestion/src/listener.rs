//! UDP listener
//!
//! One listener per configured port. Its only job is to receive a
//! datagram and forward it, tagged with the port's vehicle id, into the
//! shared queue.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_channel::Sender;
use bytes::Bytes;
use contracts::{RawPacket, VehicleId};
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::config::IngestionMetrics;
use crate::error::{IngestionError, Result};

const RECV_BACKOFF_BASE: Duration = Duration::from_millis(10);
const RECV_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Pause after `consecutive` receive errors in a row, doubling up to a cap
fn recv_backoff(consecutive: u32) -> Duration {
    let factor = 1u32 << consecutive.saturating_sub(1).min(16);
    RECV_BACKOFF_BASE.saturating_mul(factor).min(RECV_BACKOFF_MAX)
}

/// A bound, not yet running, UDP listener.
pub struct UdpListener {
    vehicle_id: VehicleId,
    socket: UdpSocket,
    local_addr: SocketAddr,
    recv_buffer_size: usize,
}

impl UdpListener {
    /// Bind `addr`. The vehicle id is the port actually bound, so port 0
    /// resolves to the OS-assigned one.
    pub async fn bind(addr: SocketAddr, recv_buffer_size: usize) -> Result<Self> {
        let bind_error = |source| IngestionError::ListenerBind {
            addr: addr.to_string(),
            source,
        };

        let socket = UdpSocket::bind(addr).await.map_err(bind_error)?;
        let local_addr = socket.local_addr().map_err(bind_error)?;

        Ok(Self {
            vehicle_id: VehicleId::from_port(local_addr.port()),
            socket,
            local_addr,
            recv_buffer_size,
        })
    }

    pub fn vehicle_id(&self) -> &VehicleId {
        &self.vehicle_id
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Run the receive loop on the current runtime until the queue closes.
    pub fn spawn(self, tx: Sender<RawPacket>, metrics: Arc<IngestionMetrics>) -> JoinHandle<()> {
        tokio::spawn(self.run(tx, metrics))
    }

    async fn run(self, tx: Sender<RawPacket>, metrics: Arc<IngestionMetrics>) {
        let mut buf = vec![0u8; self.recv_buffer_size];
        debug!(vehicle = %self.vehicle_id, addr = %self.local_addr, "listener started");

        let mut consecutive_errors = 0u32;
        loop {
            let (len, peer) = match self.socket.recv_from(&mut buf).await {
                Ok(received) => {
                    consecutive_errors = 0;
                    received
                }
                Err(e) => {
                    consecutive_errors = consecutive_errors.saturating_add(1);
                    metrics.record_receive_error();
                    warn!(
                        vehicle = %self.vehicle_id,
                        error = %e,
                        consecutive = consecutive_errors,
                        "receive failed"
                    );
                    tokio::time::sleep(recv_backoff(consecutive_errors)).await;
                    continue;
                }
            };

            metrics.record_received();
            metrics::counter!(
                observability::PACKETS_RECEIVED_TOTAL,
                "vehicle" => self.vehicle_id.to_string()
            )
            .increment(1);
            trace!(vehicle = %self.vehicle_id, %peer, len, "datagram received");

            let packet = RawPacket::new(self.vehicle_id.clone(), Bytes::copy_from_slice(&buf[..len]));

            // Blocks while the queue is full
            if tx.send(packet).await.is_err() {
                debug!(vehicle = %self.vehicle_id, "queue closed, listener exiting");
                break;
            }
            metrics.update_queue_len(tx.len());
        }
    }
}

//! Ingestion Pipeline main entry

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use async_channel::{bounded, Receiver, Sender};
use contracts::{ListenerConfig, RawPacket, VehicleId};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument};

use crate::config::IngestionMetrics;
use crate::error::{IngestionError, Result};
use crate::listener::UdpListener;

/// Ingestion Pipeline
///
/// Owns every UDP listener and the single bounded queue they feed.
/// Exactly one consumer drains the queue via [`take_receiver`].
///
/// [`take_receiver`]: IngestionPipeline::take_receiver
pub struct IngestionPipeline {
    /// Bound listeners waiting for `start_all`
    pending: Vec<UdpListener>,

    /// (vehicle, bound address) per listener, in configured order
    endpoints: Vec<(VehicleId, SocketAddr)>,

    /// Running listener tasks
    tasks: Vec<JoinHandle<()>>,

    /// Shared metrics
    metrics: Arc<IngestionMetrics>,

    /// Queue sender (cloned into every listener)
    tx: Sender<RawPacket>,

    /// Queue receiver
    rx: Option<Receiver<RawPacket>>,
}

impl IngestionPipeline {
    /// Bind one listener per port.
    ///
    /// All-or-nothing: if any port fails to bind, every socket bound so
    /// far is released and the error is returned.
    #[instrument(
        name = "ingestion_bind",
        skip(config, ports),
        fields(bind = %config.bind_address, ports = ports.len())
    )]
    pub async fn bind(config: &ListenerConfig, ports: &[u16]) -> Result<Self> {
        let ip: IpAddr = config.bind_address.parse().map_err(|e: std::net::AddrParseError| {
            IngestionError::InvalidBindAddress {
                addr: config.bind_address.clone(),
                message: e.to_string(),
            }
        })?;

        let mut pending = Vec::with_capacity(ports.len());
        for &port in ports {
            let listener = UdpListener::bind(SocketAddr::new(ip, port), config.recv_buffer_size).await?;
            debug!(vehicle = %listener.vehicle_id(), addr = %listener.local_addr(), "listener bound");
            pending.push(listener);
        }

        let endpoints = pending
            .iter()
            .map(|l| (l.vehicle_id().clone(), l.local_addr()))
            .collect();
        let (tx, rx) = bounded(config.queue_capacity);

        info!(listeners = pending.len(), capacity = config.queue_capacity, "listeners bound");

        Ok(Self {
            pending,
            endpoints,
            tasks: Vec::new(),
            metrics: Arc::new(IngestionMetrics::new()),
            tx,
            rx: Some(rx),
        })
    }

    /// Start every bound listener
    #[instrument(name = "ingestion_start_all", skip(self))]
    pub fn start_all(&mut self) -> Result<()> {
        if !self.tasks.is_empty() {
            return Err(IngestionError::AlreadyStarted);
        }

        info!(count = self.pending.len(), "starting all listeners");
        for listener in self.pending.drain(..) {
            self.tasks
                .push(listener.spawn(self.tx.clone(), self.metrics.clone()));
        }
        Ok(())
    }

    /// Stop all listeners
    #[instrument(name = "ingestion_stop_all", skip(self))]
    pub fn stop_all(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        info!(count = self.tasks.len(), "stopping all listeners");
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    /// Get the queue receiver
    ///
    /// Note: Can only be called once, subsequent calls return None
    pub fn take_receiver(&mut self) -> Option<Receiver<RawPacket>> {
        self.rx.take()
    }

    /// Vehicle id and bound address of every listener
    pub fn endpoints(&self) -> &[(VehicleId, SocketAddr)] {
        &self.endpoints
    }

    /// Get metrics reference
    pub fn metrics(&self) -> Arc<IngestionMetrics> {
        self.metrics.clone()
    }

    /// Number of listeners
    pub fn listener_count(&self) -> usize {
        self.endpoints.len()
    }
}

impl Drop for IngestionPipeline {
    fn drop(&mut self) {
        self.stop_all();
    }
}

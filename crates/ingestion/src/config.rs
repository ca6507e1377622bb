//! Ingestion metrics

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Ingestion counters shared by every listener task and the consumer
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// Total datagrams received
    pub packets_received: AtomicU64,

    /// Socket receive failures
    pub receive_errors: AtomicU64,

    /// Packets rejected by the decoder
    pub decode_errors: AtomicU64,

    /// Queue length seen by the last producer
    pub queue_len: AtomicUsize,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record datagram received
    pub fn record_received(&self) {
        self.packets_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record socket receive failure
    pub fn record_receive_error(&self) {
        self.receive_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Record decode failure
    pub fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Update queue length
    pub fn update_queue_len(&self, len: usize) {
        self.queue_len.store(len, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_received: self.packets_received.load(Ordering::Relaxed),
            receive_errors: self.receive_errors.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            queue_len: self.queue_len.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total datagrams received
    pub packets_received: u64,

    /// Socket receive failures
    pub receive_errors: u64,

    /// Packets rejected by the decoder
    pub decode_errors: u64,

    /// Queue length seen by the last producer
    pub queue_len: usize,
}

//! RecorderConfig - Config Loader output
//!
//! Describes where to listen and where finished histories go.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete recorder configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Listener settings
    #[serde(default)]
    pub listener: ListenerConfig,

    /// Export destinations (empty = one CSV exporter in the working directory)
    #[serde(default)]
    pub exporters: Vec<ExporterConfig>,
}

/// UDP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerConfig {
    /// Port specification: comma list or inclusive `start-end` range
    #[serde(default = "default_ports")]
    pub ports: String,

    /// Address every listener binds on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Capacity of the shared packet queue
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Per-listener receive buffer in bytes
    #[serde(default = "default_recv_buffer_size")]
    pub recv_buffer_size: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            ports: default_ports(),
            bind_address: default_bind_address(),
            queue_capacity: default_queue_capacity(),
            recv_buffer_size: default_recv_buffer_size(),
        }
    }
}

fn default_ports() -> String {
    "5030-5040".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_queue_capacity() -> usize {
    1000
}

fn default_recv_buffer_size() -> usize {
    1024
}

/// Exporter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Exporter name (used for logging/metrics)
    pub name: String,

    /// Exporter type
    pub exporter_type: ExporterType,

    /// Type-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl ExporterConfig {
    /// CSV exporter writing into `output_dir`
    pub fn csv(name: impl Into<String>, output_dir: impl Into<String>) -> Self {
        let mut params = HashMap::new();
        params.insert("output_dir".to_string(), output_dir.into());
        Self {
            name: name.into(),
            exporter_type: ExporterType::Csv,
            params,
        }
    }
}

/// Exporter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExporterType {
    /// One CSV file per vehicle
    Csv,
    /// Per-vehicle summary through tracing
    Log,
}

impl RecorderConfig {
    /// Configured exporters, or the default CSV exporter when none are set
    pub fn effective_exporters(&self) -> Vec<ExporterConfig> {
        if self.exporters.is_empty() {
            vec![ExporterConfig::csv("csv", ".")]
        } else {
            self.exporters.clone()
        }
    }
}

//! Pipeline statistics.

use std::time::Duration;

use observability::RecordingSummary;

use super::LoopOutcome;

/// Statistics from a recorder run
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// How the ingestion loop ended
    pub outcome: LoopOutcome,

    /// Total datagrams received by the listeners
    pub packets_received: u64,

    /// Packets the decoder rejected
    pub decode_errors: u64,

    /// Recorded history length per vehicle, in first-seen order
    pub vehicles: Vec<(String, usize)>,

    /// Successful (exporter, vehicle) exports
    pub exported: usize,

    /// One line per failed export
    pub export_failures: Vec<String>,

    /// Total duration of the run
    pub duration: Duration,

    /// Per-vehicle decoded-packet statistics
    pub summary: RecordingSummary,
}

impl PipelineStats {
    /// Packets per second over the whole run
    pub fn packet_rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.packets_received as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Recorder Statistics ===\n");

        println!("Overview");
        println!("   Outcome: {:?}", self.outcome);
        println!("   Duration: {:.2}s", self.duration.as_secs_f64());
        println!("   Packets received: {}", self.packets_received);
        println!("   Packet rate: {:.1}/s", self.packet_rate());
        println!("   Decode errors: {}", self.decode_errors);

        println!("\nTotal cars: {}", self.vehicles.len());
        for (name, records) in &self.vehicles {
            println!("   -- {} has {} states", name, records);
        }

        println!("\n{}", self.summary);

        println!("Exports: {} written", self.exported);
        if !self.export_failures.is_empty() {
            println!("\nFailed exports ({})", self.export_failures.len());
            for failure in &self.export_failures {
                println!("   - {}", failure);
            }
        }

        println!();
    }
}

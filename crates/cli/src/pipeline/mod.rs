//! Pipeline orchestration module.

mod orchestrator;
mod recorder;
mod stats;

pub use orchestrator::{Pipeline, PipelineConfig};
pub use recorder::{record_until_finished, LoopOutcome};
pub use stats::PipelineStats;

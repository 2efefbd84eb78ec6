pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{run_precomputed, run_segment};
pub use types::{NoOpReporter, PipelineStage, ProgressReporter, RunOutput};

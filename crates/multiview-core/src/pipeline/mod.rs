pub mod cancel;
pub mod config;
mod context;
mod orchestrator;
pub mod seed;
mod types;

pub use cancel::CancellationToken;
pub use orchestrator::Pipeline;
pub use types::{
    DroppedView, GenerationOutput, GenerationRequest, NoOpReporter, PipelineStage,
    ProgressReporter,
};

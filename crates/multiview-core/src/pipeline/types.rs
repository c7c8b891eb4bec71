use std::path::PathBuf;
use std::time::Duration;

use crate::frame::ColorFrame;
use crate::validate::ConsistencyReport;
use crate::views::{ViewResult, ViewRole};

use super::config::ReconstructionOverrides;

/// Pipeline processing stage, used for progress reporting and for
/// classifying which stage a failed request stopped in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Enhance,
    GeneratePrimary,
    GenerateComplementary,
    Normalize,
    Validate,
    Reconstruct,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enhance => write!(f, "Enhancing input"),
            Self::GeneratePrimary => write!(f, "Generating primary view"),
            Self::GenerateComplementary => write!(f, "Generating views"),
            Self::Normalize => write!(f, "Normalizing lighting"),
            Self::Validate => write!(f, "Checking consistency"),
            Self::Reconstruct => write!(f, "Reconstructing"),
        }
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., view count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, the default for a new pipeline.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// One end-to-end request.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub image: ColorFrame,
    /// Negative means "pick a random seed".
    pub seed: i64,
    pub reconstruction: ReconstructionOverrides,
}

impl GenerationRequest {
    pub fn new(image: ColorFrame, seed: i64) -> Self {
        Self {
            image,
            seed,
            reconstruction: ReconstructionOverrides::default(),
        }
    }
}

/// A view that was dropped from the set, and why.
#[derive(Clone, Debug, PartialEq)]
pub struct DroppedView {
    pub role: ViewRole,
    pub reason: String,
}

/// Everything a completed request produced.
#[derive(Clone, Debug)]
pub struct GenerationOutput {
    /// Binary geometry artifact from the reconstruction backend.
    pub artifact: Vec<u8>,
    /// Seed actually used for every backend call.
    pub seed: u64,
    /// Final views in submission order, primary first.
    pub views: Vec<ViewResult>,
    pub dropped: Vec<DroppedView>,
    pub target_brightness: f64,
    pub report: ConsistencyReport,
    pub reconstruction_elapsed: Option<Duration>,
    pub elapsed: Duration,
    /// Directory the generated files were written to, when enabled.
    pub saved_to: Option<PathBuf>,
}

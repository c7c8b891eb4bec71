//! Boundaries to the external services. Each service is a trait so the
//! pipeline can run against HTTP adapters in production and scripted
//! fakes in tests.

pub mod codec;
pub mod http;

use std::time::Duration;

use crate::error::Result;
use crate::frame::ColorFrame;
use crate::pipeline::config::ReconstructionParams;

pub use http::{HttpBackends, HttpBackgroundRemover, HttpEditBackend, HttpReconstructionBackend};

/// One image-edit call.
#[derive(Clone, Debug)]
pub struct EditRequest<'a> {
    pub image: &'a ColorFrame,
    pub prompt: &'a str,
    pub negative_prompt: &'a str,
    pub seed: u64,
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
}

/// Neural image editing service that re-renders the subject.
pub trait EditBackend: Send + Sync {
    fn name(&self) -> &str;

    fn edit(&self, request: &EditRequest<'_>) -> Result<ColorFrame>;
}

#[derive(Clone, Debug)]
pub struct BackgroundRequest<'a> {
    pub image: &'a ColorFrame,
    /// Edge length of the square output, pixels.
    pub output_size: u32,
    /// Fraction of the output left as padding around the subject.
    pub padding: f32,
}

/// Service that replaces the background with a neutral fill.
pub trait BackgroundRemover: Send + Sync {
    fn name(&self) -> &str;

    fn remove_background(&self, request: &BackgroundRequest<'_>) -> Result<ColorFrame>;
}

/// Ordered view set plus quality parameters.
#[derive(Clone, Debug)]
pub struct ReconstructionRequest<'a> {
    /// Primary view first.
    pub images: Vec<&'a ColorFrame>,
    pub seed: u64,
    pub params: ReconstructionParams,
}

#[derive(Clone, Debug)]
pub struct ReconstructionResult {
    /// Binary geometry artifact (PLY).
    pub artifact: Vec<u8>,
    /// Backend-reported generation time, when provided.
    pub elapsed: Option<Duration>,
}

/// Image-to-3D service consuming the final view set.
pub trait ReconstructionBackend: Send + Sync {
    fn name(&self) -> &str;

    fn reconstruct(&self, request: &ReconstructionRequest<'_>) -> Result<ReconstructionResult>;
}

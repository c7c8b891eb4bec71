use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::backend::{EditBackend, EditRequest};
use crate::error::{MultiviewError, Result};
use crate::filters::resample::{dimensions_for_megapixels, resample_color};
use crate::frame::ColorFrame;
use crate::pipeline::config::EditConfig;
use crate::views::ViewSpec;

/// An edited image tagged with how it was produced.
#[derive(Clone, Debug)]
pub struct EditedView {
    pub image: ColorFrame,
    pub elapsed: Duration,
    pub seed: u64,
}

/// Boundary adapter over the edit backend. Builds the request payload and
/// classifies every backend failure as a `ViewGeneration` error for the
/// view being requested; whether that is fatal is the caller's decision.
#[derive(Clone)]
pub struct ViewEditorClient {
    backend: Arc<dyn EditBackend>,
    params: EditConfig,
}

impl ViewEditorClient {
    pub fn new(backend: Arc<dyn EditBackend>, params: EditConfig) -> Self {
        Self { backend, params }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Resample to the configured megapixel budget, keeping aspect ratio.
    pub fn prepare_image(&self, image: &ColorFrame) -> ColorFrame {
        if self.params.megapixels <= 0.0 {
            return image.clone();
        }
        let (w, h) =
            dimensions_for_megapixels(image.width(), image.height(), self.params.megapixels);
        resample_color(image, w, h)
    }

    /// Issue one edit request for `spec`.
    pub fn edit_view(&self, image: &ColorFrame, spec: &ViewSpec, seed: u64) -> Result<EditedView> {
        let prepared = self.prepare_image(image);
        let request = EditRequest {
            image: &prepared,
            prompt: &spec.prompt,
            negative_prompt: &self.params.negative_prompt,
            seed,
            num_inference_steps: self.params.num_inference_steps,
            guidance_scale: self.params.guidance_scale,
        };

        let start = Instant::now();
        let edited = self
            .backend
            .edit(&request)
            .and_then(|img| img.validate().map(|()| img))
            .map_err(|e| MultiviewError::ViewGeneration {
                role: spec.role,
                reason: e.to_string(),
            })?;
        let elapsed = start.elapsed();

        debug!(
            role = %spec.role,
            seed,
            elapsed_ms = elapsed.as_millis() as u64,
            "Edit backend returned view"
        );
        Ok(EditedView {
            image: edited,
            elapsed,
            seed,
        })
    }
}

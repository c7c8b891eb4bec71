use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, info, warn};

use crate::backend::{
    BackgroundRemover, BackgroundRequest, EditBackend, ReconstructionBackend,
    ReconstructionRequest, ReconstructionResult,
};
use crate::color::calibrate::calibrate;
use crate::consts::{MIN_VIEWS_FOR_RECONSTRUCTION, WARMUP_SEED, WARMUP_SIZE};
use crate::editor::ViewEditorClient;
use crate::enhance::enhance;
use crate::error::{MultiviewError, Result};
use crate::frame::ColorFrame;
use crate::io::artifacts::save_generated_files;
use crate::io::image_io::decode_image;
use crate::lighting::normalize_lighting;
use crate::validate::validate_views;
use crate::views::{ViewResult, ViewRole, ViewSpec};

use super::cancel::CancellationToken;
use super::config::{PipelineConfig, ReconstructionOverrides};
use super::context::GenerationContext;
use super::seed::resolve_seed;
use super::types::{
    GenerationOutput, GenerationRequest, NoOpReporter, PipelineStage, ProgressReporter,
};

/// Sequences enhancement, view generation, calibration, background removal,
/// lighting normalization, validation and reconstruction for one request
/// at a time. Holds only read-only configuration, backend handles and its
/// view worker pool, so a single instance can serve concurrent requests.
pub struct Pipeline {
    config: Arc<PipelineConfig>,
    editor: ViewEditorClient,
    background: Option<Arc<dyn BackgroundRemover>>,
    reconstruction: Arc<dyn ReconstructionBackend>,
    reporter: Arc<dyn ProgressReporter>,
    /// Runs the blocking per-view backend calls, one worker per
    /// complementary view, apart from the global pool used by the filters.
    view_pool: ThreadPool,
}

impl Pipeline {
    /// Validates `config`. The background remover is ignored when background
    /// removal is disabled in the configuration.
    pub fn new(
        config: Arc<PipelineConfig>,
        edit: Arc<dyn EditBackend>,
        background: Option<Arc<dyn BackgroundRemover>>,
        reconstruction: Arc<dyn ReconstructionBackend>,
    ) -> Result<Self> {
        config.validate()?;
        let background = background.filter(|_| config.background.enabled);
        let view_pool = ThreadPoolBuilder::new()
            .num_threads(config.complementary_views().len().max(1))
            .thread_name(|i| format!("multiview-view-{i}"))
            .build()
            .map_err(|e| {
                MultiviewError::Io(std::io::Error::other(format!(
                    "failed to start view worker pool: {e}"
                )))
            })?;
        Ok(Self {
            editor: ViewEditorClient::new(edit, config.edit.clone()),
            config,
            background,
            reconstruction,
            reporter: Arc::new(NoOpReporter),
            view_pool,
        })
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one request on a small grey image so every backend loads its
    /// models before real traffic arrives.
    pub fn warmup(&self) -> Result<()> {
        info!("Warming up pipeline");
        let image = ColorFrame::filled(WARMUP_SIZE, WARMUP_SIZE, [128, 128, 128]);
        let output = self.generate(
            GenerationRequest::new(image, WARMUP_SEED),
            &CancellationToken::new(),
        )?;
        info!(
            elapsed_ms = output.elapsed.as_millis() as u64,
            "Warm-up complete, pipeline ready"
        );
        Ok(())
    }

    /// Decode an uploaded image and run the full pipeline on it.
    pub fn generate_from_bytes(&self, bytes: &[u8], seed: i64) -> Result<GenerationOutput> {
        let image = decode_image(bytes)?;
        self.generate(GenerationRequest::new(image, seed), &CancellationToken::new())
    }

    /// Run one end-to-end request.
    ///
    /// Returns the finished artifact with the consistency report attached,
    /// or the first fatal error: invalid input, a failed primary view, fewer
    /// than two surviving views, a failed reconstruction, or cancellation.
    pub fn generate(
        &self,
        request: GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<GenerationOutput> {
        let start = Instant::now();
        cancel.check()?;
        let seed = resolve_seed(request.seed)?;
        info!(
            seed,
            views = self.config.views.len(),
            edit_backend = self.editor.backend_name(),
            "New generation request"
        );

        // Enhance
        self.reporter.begin_stage(PipelineStage::Enhance, None);
        let enhanced = enhance(&request.image, &self.config.enhance)?;
        self.reporter.finish_stage();
        let mut ctx = GenerationContext::new(request.image, enhanced, seed);

        // Primary
        cancel.check()?;
        self.reporter
            .begin_stage(PipelineStage::GeneratePrimary, Some(1));
        let primary = self.generate_primary(&ctx, cancel)?;
        ctx.views.push(primary);
        self.reporter.advance(1);
        self.reporter.finish_stage();

        // Complementary views fan out; collect is the barrier.
        self.generate_complementary(&mut ctx, cancel)?;
        if ctx.views.len() < MIN_VIEWS_FOR_RECONSTRUCTION {
            warn!(
                survived = ctx.views.len(),
                dropped = ctx.dropped.len(),
                "Too few views survived generation"
            );
            return Err(MultiviewError::InsufficientViews {
                survived: ctx.views.len(),
                required: MIN_VIEWS_FOR_RECONSTRUCTION,
            });
        }

        // Normalize
        cancel.check()?;
        self.reporter
            .begin_stage(PipelineStage::Normalize, Some(ctx.views.len()));
        let outcome = normalize_lighting(&ctx.view_images(), &self.config.correction)?;
        for (view, (image, factor)) in ctx
            .views
            .iter_mut()
            .zip(outcome.views.into_iter().zip(outcome.factors))
        {
            view.image = image;
            view.brightness_factor = factor;
        }
        info!(
            target_brightness = outcome.target_brightness,
            "Normalized lighting across views"
        );
        self.reporter.finish_stage();

        // Validate
        self.reporter.begin_stage(PipelineStage::Validate, None);
        let roles: Vec<(ViewRole, &ColorFrame)> =
            ctx.views.iter().map(|v| (v.role, &v.image)).collect();
        let report = validate_views(&roles, &ctx.original, &self.config.validation);
        for (view, reading) in ctx.views.iter_mut().zip(&report.readings) {
            view.variance_check_passed = reading.within(self.config.validation.channel_threshold);
        }
        for warning in &report.warnings {
            warn!(%warning, "Consistency warning");
        }
        info!(
            passed = report.passed(),
            warnings = report.warnings.len(),
            contrast_variance = report.contrast_variance,
            "Consistency check complete"
        );
        self.reporter.finish_stage();

        // Reconstruct
        cancel.check()?;
        self.reporter.begin_stage(PipelineStage::Reconstruct, None);
        let result = self.reconstruct(&ctx, &request.reconstruction)?;
        self.reporter.finish_stage();

        let saved_to = if self.config.output.save_generated_files {
            match save_generated_files(
                &self.config.output.output_dir,
                ctx.seed,
                &ctx.original,
                &ctx.views,
                &result.artifact,
            ) {
                Ok(dir) => Some(dir),
                Err(e) => {
                    warn!(error = %e, "Failed to save generated files");
                    None
                }
            }
        } else {
            None
        };

        let elapsed = start.elapsed();
        info!(
            seed,
            views = ctx.views.len(),
            artifact_bytes = result.artifact.len(),
            elapsed_secs = elapsed.as_secs_f64(),
            "Generation complete"
        );

        Ok(GenerationOutput {
            artifact: result.artifact,
            seed,
            views: ctx.views,
            dropped: ctx.dropped,
            target_brightness: outcome.target_brightness,
            report,
            reconstruction_elapsed: result.elapsed,
            elapsed,
            saved_to,
        })
    }

    /// The primary view is irreplaceable: any failure here is fatal.
    fn generate_primary(
        &self,
        ctx: &GenerationContext,
        cancel: &CancellationToken,
    ) -> Result<ViewResult> {
        let spec = self
            .config
            .primary_view()
            .ok_or_else(|| MultiviewError::Config("no primary view configured".into()))?;

        let view = if self.config.use_original_as_primary {
            info!("Using enhanced input as primary view");
            ViewResult::unedited(spec.role, ctx.enhanced.clone())
        } else {
            self.produce_edited_view(&ctx.enhanced, spec, ctx.seed, cancel)?
        };
        self.remove_background(view, cancel)
    }

    /// Edit, calibrate and clean every complementary view concurrently.
    /// Failed views are dropped; cancellation aborts the request.
    fn generate_complementary(
        &self,
        ctx: &mut GenerationContext,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let specs = self.config.complementary_views();
        self.reporter
            .begin_stage(PipelineStage::GenerateComplementary, Some(specs.len()));

        let done = AtomicUsize::new(0);
        let reference = &ctx.enhanced;
        let seed = ctx.seed;
        let outcomes: Vec<(ViewRole, Result<ViewResult>)> = self.view_pool.install(|| {
            specs
                .par_iter()
                .map(|spec| {
                    let result = self
                        .produce_edited_view(reference, spec, seed, cancel)
                        .and_then(|view| self.remove_background(view, cancel));
                    self.reporter
                        .advance(done.fetch_add(1, Ordering::Relaxed) + 1);
                    (spec.role, result)
                })
                .collect()
        });
        self.reporter.finish_stage();
        cancel.check()?;

        for (role, outcome) in outcomes {
            match outcome {
                Ok(view) => ctx.views.push(view),
                Err(MultiviewError::Cancelled) => return Err(MultiviewError::Cancelled),
                Err(e) => {
                    warn!(role = %role, error = %e, "Dropping view");
                    ctx.drop_view(role, e.to_string());
                }
            }
        }
        Ok(())
    }

    fn produce_edited_view(
        &self,
        reference: &ColorFrame,
        spec: &ViewSpec,
        seed: u64,
        cancel: &CancellationToken,
    ) -> Result<ViewResult> {
        cancel.check()?;
        let edited = self.editor.edit_view(reference, spec, seed)?;
        let calibration = calibrate(reference, &edited.image, &self.config.correction)?;
        let [r, g, b] = calibration.factors;
        info!(role = %spec.role, r, g, b, "Applied color calibration");

        Ok(ViewResult {
            role: spec.role,
            edited: Some(calibration.image.clone()),
            image: calibration.image,
            color_factors: calibration.factors,
            brightness_factor: 1.0,
            variance_check_passed: true,
            edit_elapsed: Some(edited.elapsed),
        })
    }

    fn remove_background(&self, view: ViewResult, cancel: &CancellationToken) -> Result<ViewResult> {
        let Some(remover) = &self.background else {
            return Ok(view);
        };
        cancel.check()?;
        let request = BackgroundRequest {
            image: &view.image,
            output_size: self.config.background.output_size,
            padding: self.config.background.padding,
        };
        let image = remover
            .remove_background(&request)
            .and_then(|img| img.validate().map(|()| img))
            .map_err(|e| MultiviewError::ViewGeneration {
                role: view.role,
                reason: format!("background removal failed: {e}"),
            })?;
        debug!(role = %view.role, backend = remover.name(), "Background removed");
        Ok(ViewResult { image, ..view })
    }

    fn reconstruct(
        &self,
        ctx: &GenerationContext,
        overrides: &ReconstructionOverrides,
    ) -> Result<ReconstructionResult> {
        let request = ReconstructionRequest {
            images: ctx.view_images(),
            seed: ctx.seed,
            params: self.config.reconstruction.overridden(overrides),
        };
        info!(
            backend = self.reconstruction.name(),
            views = request.images.len(),
            seed = ctx.seed,
            "Submitting views for reconstruction"
        );

        let start = Instant::now();
        let result = self
            .reconstruction
            .reconstruct(&request)
            .map_err(|e| match e {
                MultiviewError::Cancelled => MultiviewError::Cancelled,
                MultiviewError::Reconstruction(msg) => MultiviewError::Reconstruction(msg),
                other => MultiviewError::Reconstruction(other.to_string()),
            })?;
        if result.artifact.is_empty() {
            return Err(MultiviewError::Reconstruction(
                "backend returned an empty artifact".into(),
            ));
        }
        info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            artifact_bytes = result.artifact.len(),
            "Reconstruction finished"
        );
        Ok(result)
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use multiview_core::backend::{
    BackgroundRemover, EditBackend, HttpBackends, ReconstructionBackend,
};
use multiview_core::io::image_io::load_image;
use multiview_core::pipeline::config::ReconstructionOverrides;
use multiview_core::pipeline::{CancellationToken, GenerationRequest, Pipeline};
use tracing::info;

use crate::progress::BarReporter;

#[derive(Args)]
pub struct RunArgs {
    /// Input photograph
    pub file: PathBuf,

    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Generation seed; negative picks a random one
    #[arg(long, default_value = "-1", allow_hyphen_values = true)]
    pub seed: i64,

    /// Save the input, every final view and the model under this directory
    #[arg(long)]
    pub save_views: Option<PathBuf>,

    /// Send a small warm-up request first
    #[arg(long)]
    pub warmup: bool,

    /// Override sparse structure sampling steps
    #[arg(long)]
    pub sparse_steps: Option<u32>,

    /// Override sparse structure guidance strength
    #[arg(long)]
    pub sparse_cfg: Option<f32>,

    /// Override SLAT sampling steps
    #[arg(long)]
    pub slat_steps: Option<u32>,

    /// Override SLAT guidance strength
    #[arg(long)]
    pub slat_cfg: Option<f32>,

    /// Override number of oversamples
    #[arg(long)]
    pub oversamples: Option<u32>,

    /// Output model path
    #[arg(short, long, default_value = "model.ply")]
    pub output: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(ref dir) = args.save_views {
        config.output.save_generated_files = true;
        config.output.output_dir = dir.clone();
    }

    let image = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;

    crate::summary::print_pipeline_summary(&config, &args.file);

    let backends = HttpBackends::from_config(&config.backends)?;
    let edit: Arc<dyn EditBackend> = Arc::new(backends.edit);
    let background: Arc<dyn BackgroundRemover> = Arc::new(backends.background);
    let reconstruction: Arc<dyn ReconstructionBackend> = Arc::new(backends.reconstruction);
    let reporter = Arc::new(BarReporter::new()?);
    let pipeline = Pipeline::new(Arc::new(config), edit, Some(background), reconstruction)?
        .with_reporter(reporter.clone());

    if args.warmup {
        pipeline.warmup().context("Warm-up request failed")?;
    }

    let mut request = GenerationRequest::new(image, args.seed);
    request.reconstruction = ReconstructionOverrides {
        sparse_structure_steps: args.sparse_steps,
        sparse_structure_cfg_strength: args.sparse_cfg,
        slat_steps: args.slat_steps,
        slat_cfg_strength: args.slat_cfg,
        num_oversamples: args.oversamples,
    };

    let output = match pipeline.generate(request, &CancellationToken::new()) {
        Ok(output) => output,
        Err(e) => {
            reporter.abandon();
            let stage = e
                .stage()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "setup".into());
            return Err(e).with_context(|| format!("Generation failed during {stage}"));
        }
    };
    reporter.finish();

    std::fs::write(&args.output, &output.artifact)
        .with_context(|| format!("Failed to write model to {}", args.output.display()))?;
    info!(bytes = output.artifact.len(), path = %args.output.display(), "Model written");

    crate::summary::print_generation_summary(&output);
    println!("\nModel saved to {}", args.output.display());

    Ok(())
}

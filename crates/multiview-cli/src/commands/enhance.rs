use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use multiview_core::enhance::{enhance, EnhanceParams};
use multiview_core::io::image_io::{load_image, save_png};

#[derive(Args)]
pub struct EnhanceArgs {
    /// Input image file
    pub file: PathBuf,

    /// Sharpness factor (1.0 disables)
    #[arg(long, default_value = "1.15")]
    pub sharpness: f32,

    /// Contrast factor (1.0 disables)
    #[arg(long, default_value = "1.1")]
    pub contrast: f32,

    /// Saturation factor (1.0 disables)
    #[arg(long, default_value = "1.05")]
    pub saturation: f32,

    /// Median filter window, 1 or less disables denoising
    #[arg(long, default_value = "3")]
    pub denoise: usize,

    /// Output file path (PNG)
    #[arg(short, long, default_value = "enhanced.png")]
    pub output: PathBuf,
}

pub fn run(args: &EnhanceArgs) -> Result<()> {
    let image = load_image(&args.file)
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    println!("Loaded {}x{} image", image.width(), image.height());

    let params = EnhanceParams {
        denoise_window: args.denoise,
        sharpness: args.sharpness,
        contrast: args.contrast,
        saturation: args.saturation,
    };
    let enhanced = enhance(&image, &params)?;

    save_png(&enhanced, &args.output)?;
    println!("Saved to {}", args.output.display());

    Ok(())
}

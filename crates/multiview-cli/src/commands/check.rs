use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use multiview_core::color::calibrate::calibrate;
use multiview_core::io::image_io::{load_image, save_png};
use multiview_core::lighting::normalize_lighting;
use multiview_core::validate::validate_views;
use multiview_core::views::{ViewResult, ViewRole};

#[derive(Args)]
pub struct CheckArgs {
    /// Original photograph, used as the color reference
    pub original: PathBuf,

    /// Generated views in left, right, back order
    #[arg(required = true)]
    pub views: Vec<PathBuf>,

    /// Pipeline config file (TOML) for bounds and thresholds
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the corrected views into this directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

const VIEW_ORDER: [ViewRole; 3] = [
    ViewRole::LeftThreeQuarter,
    ViewRole::RightThreeQuarter,
    ViewRole::Back,
];

/// Run calibration, lighting normalization and the consistency check on
/// views produced elsewhere, without contacting any backend.
pub fn run(args: &CheckArgs) -> Result<()> {
    if args.views.len() > VIEW_ORDER.len() {
        bail!("At most {} views can be checked", VIEW_ORDER.len());
    }
    let config = super::load_config(args.config.as_deref())?;
    let original = load_image(&args.original)
        .with_context(|| format!("Failed to load {}", args.original.display()))?;

    let mut views = vec![ViewResult::unedited(ViewRole::Primary, original.clone())];
    for (path, role) in args.views.iter().zip(VIEW_ORDER) {
        let image =
            load_image(path).with_context(|| format!("Failed to load {}", path.display()))?;
        let calibration = calibrate(&original, &image, &config.correction)?;
        views.push(ViewResult {
            color_factors: calibration.factors,
            ..ViewResult::unedited(role, calibration.image)
        });
    }

    let images: Vec<_> = views.iter().map(|v| &v.image).collect();
    let outcome = normalize_lighting(&images, &config.correction)?;
    for (view, (image, factor)) in views
        .iter_mut()
        .zip(outcome.views.into_iter().zip(outcome.factors))
    {
        view.image = image;
        view.brightness_factor = factor;
    }

    let roles: Vec<_> = views.iter().map(|v| (v.role, &v.image)).collect();
    let report = validate_views(&roles, &original, &config.validation);

    crate::summary::print_check_summary(&views, &report);

    if let Some(ref dir) = args.output {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        for view in &views[1..] {
            let path = dir.join(format!("{}.png", view.role));
            save_png(&view.image, &path)?;
            println!("Saved {}", path.display());
        }
    }

    Ok(())
}

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::error::Result;
use crate::frame::ColorFrame;
use crate::views::ViewResult;

use super::image_io::save_png;

/// File name of the geometry artifact inside a request directory.
pub const ARTIFACT_FILE_NAME: &str = "model.ply";

fn timestamp_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Write the input, every final view and the artifact of one request into
/// a fresh directory under `output_dir`. Returns that directory.
///
/// Views produced by an edit call also get `NN_role_edited.png`, the
/// calibrated edit before background removal and normalization.
pub fn save_generated_files(
    output_dir: &Path,
    seed: u64,
    original: &ColorFrame,
    views: &[ViewResult],
    artifact: &[u8],
) -> Result<PathBuf> {
    let dir = output_dir.join(format!("{}_seed{}", timestamp_millis(), seed));
    fs::create_dir_all(&dir)?;

    save_png(original, &dir.join("input_original.png"))?;
    for (i, view) in views.iter().enumerate() {
        let path = dir.join(format!("{:02}_{}.png", i, view.role));
        save_png(&view.image, &path)?;
        if let Some(edited) = &view.edited {
            save_png(edited, &dir.join(format!("{:02}_{}_edited.png", i, view.role)))?;
        }
        debug!(path = %path.display(), "Saved view");
    }
    fs::write(dir.join(ARTIFACT_FILE_NAME), artifact)?;

    Ok(dir)
}

//! Pre-enhancement applied to the input photograph before any view is
//! requested.
//!
//! Order matters: the median pass softens edges slightly, and the sharpness
//! boost that follows compensates for it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{CONTRAST_FACTOR, DENOISE_WINDOW, SATURATION_FACTOR, SHARPNESS_FACTOR};
use crate::error::Result;
use crate::filters::levels::{adjust_contrast, adjust_saturation};
use crate::filters::median::median_filter_color;
use crate::filters::sharpness::adjust_sharpness_color;
use crate::frame::ColorFrame;

/// Fixed enhancement factors. All boosts are small multiplicative
/// adjustments; 1.0 disables a step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceParams {
    pub denoise_window: usize,
    pub sharpness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            denoise_window: DENOISE_WINDOW,
            sharpness: SHARPNESS_FACTOR,
            contrast: CONTRAST_FACTOR,
            saturation: SATURATION_FACTOR,
        }
    }
}

/// Denoise, then apply mild sharpness, contrast and saturation boosts.
///
/// Returns a new image of identical dimensions. Fails only on a zero-sized
/// or malformed input.
pub fn enhance(image: &ColorFrame, params: &EnhanceParams) -> Result<ColorFrame> {
    image.validate()?;

    let denoised = median_filter_color(image, params.denoise_window);
    let sharpened = adjust_sharpness_color(&denoised, params.sharpness);
    let contrasted = adjust_contrast(&sharpened, params.contrast);
    let saturated = adjust_saturation(&contrasted, params.saturation);

    debug!(
        width = saturated.width(),
        height = saturated.height(),
        "Enhanced image quality"
    );
    Ok(saturated)
}

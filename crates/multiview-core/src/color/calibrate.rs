//! Post-edit color calibration.
//!
//! Pulls an edited view's per-channel averages back toward the reference
//! image with one bounded multiplicative factor per channel.

use crate::error::Result;
use crate::filters::resample::resample_color;
use crate::frame::ColorFrame;
use crate::pipeline::config::CorrectionBounds;

use super::stats::bounded_ratio;

/// Output of [`calibrate`]: the corrected image and the factors applied.
#[derive(Clone, Debug)]
pub struct Calibration {
    pub image: ColorFrame,
    /// Per-channel (R, G, B) factors, each within the correction bounds,
    /// or exactly 1.0 for a channel that was fully black.
    pub factors: [f64; 3],
}

/// Per-channel factors that move `edited`'s means toward `reference`'s.
///
/// When sizes differ, `edited` is resampled onto the reference grid before
/// statistics are taken.
pub fn calibration_factors(
    reference: &ColorFrame,
    edited: &ColorFrame,
    bounds: &CorrectionBounds,
) -> Result<[f64; 3]> {
    reference.validate()?;
    edited.validate()?;

    let edited_means = if edited.width() == reference.width()
        && edited.height() == reference.height()
    {
        edited.channel_means()
    } else {
        resample_color(edited, reference.width(), reference.height()).channel_means()
    };
    let reference_means = reference.channel_means();

    let mut factors = [1.0; 3];
    for (i, factor) in factors.iter_mut().enumerate() {
        *factor = bounded_ratio(reference_means[i], edited_means[i], bounds);
    }
    Ok(factors)
}

/// Match `edited`'s channel statistics to `reference`'s.
///
/// Deterministic and free of I/O. The returned image keeps `edited`'s
/// dimensions; every value saturates to the valid range.
pub fn calibrate(
    reference: &ColorFrame,
    edited: &ColorFrame,
    bounds: &CorrectionBounds,
) -> Result<Calibration> {
    let factors = calibration_factors(reference, edited, bounds)?;
    Ok(Calibration {
        image: edited.scale_channels(factors),
        factors,
    })
}

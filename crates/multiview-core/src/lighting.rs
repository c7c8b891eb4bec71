use crate::color::stats::{bounded_ratio, median};
use crate::error::Result;
use crate::frame::ColorFrame;
use crate::pipeline::config::CorrectionBounds;

/// Result of normalizing a whole view set.
#[derive(Clone, Debug)]
pub struct NormalizationOutcome {
    /// Adjusted views, same order as the input.
    pub views: Vec<ColorFrame>,
    /// Median of the input brightness values.
    pub target_brightness: f64,
    /// Uniform factor applied to each view, same order as the input.
    pub factors: Vec<f64>,
}

/// Bring every view toward the median brightness of the set.
///
/// Each view is scaled uniformly across its three channels by
/// `clamp(target / brightness)`; the median keeps one outlier view from
/// dragging the others. An empty set yields an empty outcome with a zero
/// target.
pub fn normalize_lighting(
    views: &[&ColorFrame],
    bounds: &CorrectionBounds,
) -> Result<NormalizationOutcome> {
    for view in views {
        view.validate()?;
    }

    let brightness: Vec<f64> = views.iter().map(|view| view.brightness()).collect();
    let Some(target) = median(&brightness) else {
        return Ok(NormalizationOutcome {
            views: Vec::new(),
            target_brightness: 0.0,
            factors: Vec::new(),
        });
    };

    let factors: Vec<f64> = brightness
        .iter()
        .map(|&b| bounded_ratio(target, b, bounds))
        .collect();
    let adjusted = views
        .iter()
        .zip(&factors)
        .map(|(view, &factor)| view.scale_channels([factor; 3]))
        .collect();

    Ok(NormalizationOutcome {
        views: adjusted,
        target_brightness: target,
        factors,
    })
}

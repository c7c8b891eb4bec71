use crate::consts::EPSILON;
use crate::pipeline::config::CorrectionBounds;

/// Median of a slice. Even-length input averages the two middle values.
/// Returns `None` on empty input.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Population variance. Zero for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

/// `target / current` clamped to `bounds`; 1.0 when `current` is zero.
pub fn bounded_ratio(target: f64, current: f64, bounds: &CorrectionBounds) -> f64 {
    if current.abs() < EPSILON {
        return 1.0;
    }
    bounds.clamp(target / current)
}

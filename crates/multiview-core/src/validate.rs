//! Advisory consistency check over the final view set.
//!
//! Nothing here can fail a request: every finding is a warning in the
//! returned [`ConsistencyReport`].

use std::fmt;

use serde::Serialize;

use crate::color::stats::variance;
use crate::frame::{Channel, ColorFrame};
use crate::pipeline::config::ValidationConfig;
use crate::views::ViewRole;

/// Per-view readings taken by the validator.
#[derive(Clone, Debug, Serialize)]
pub struct ViewReading {
    pub role: ViewRole,
    /// |view mean - original mean| per channel (R, G, B), 0-255 units.
    pub channel_deviation: [f64; 3],
    /// Contrast proxy: mean of the three channel standard deviations.
    pub contrast: f64,
}

impl ViewReading {
    pub fn within(&self, threshold: f64) -> bool {
        self.channel_deviation.iter().all(|&d| d <= threshold)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ConsistencyWarning {
    ChannelDeviation {
        role: ViewRole,
        channel: Channel,
        deviation: f64,
        threshold: f64,
    },
    ContrastVariance { variance: f64, threshold: f64 },
}

impl fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChannelDeviation {
                role,
                channel,
                deviation,
                threshold,
            } => write!(
                f,
                "{role}: {channel} mean differs from original by {deviation:.1} (> {threshold:.1})"
            ),
            Self::ContrastVariance {
                variance,
                threshold,
            } => write!(
                f,
                "contrast variance across views is {variance:.1} (> {threshold:.1})"
            ),
        }
    }
}

/// Advisory verdict on a view set.
#[derive(Clone, Debug, Serialize)]
pub struct ConsistencyReport {
    pub readings: Vec<ViewReading>,
    pub contrast_variance: f64,
    pub warnings: Vec<ConsistencyWarning>,
}

impl ConsistencyReport {
    pub fn passed(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Compare each view's channel means against `original`'s and the spread
/// of contrast across views against the configured thresholds.
///
/// A warning is raised only when a reading strictly exceeds its threshold.
pub fn validate_views(
    views: &[(ViewRole, &ColorFrame)],
    original: &ColorFrame,
    config: &ValidationConfig,
) -> ConsistencyReport {
    let original_means = original.channel_means();
    let mut warnings = Vec::new();

    let readings: Vec<ViewReading> = views
        .iter()
        .map(|&(role, view)| {
            let means = view.channel_means();
            let mut channel_deviation = [0.0; 3];
            for channel in Channel::ALL {
                let i = channel.index();
                let deviation = (means[i] - original_means[i]).abs();
                channel_deviation[i] = deviation;
                if deviation > config.channel_threshold {
                    warnings.push(ConsistencyWarning::ChannelDeviation {
                        role,
                        channel,
                        deviation,
                        threshold: config.channel_threshold,
                    });
                }
            }
            let contrast = view.channel_std_devs().iter().sum::<f64>() / 3.0;
            ViewReading {
                role,
                channel_deviation,
                contrast,
            }
        })
        .collect();

    let contrasts: Vec<f64> = readings.iter().map(|r| r.contrast).collect();
    let contrast_variance = variance(&contrasts);
    if contrast_variance > config.contrast_threshold {
        warnings.push(ConsistencyWarning::ContrastVariance {
            variance: contrast_variance,
            threshold: config.contrast_threshold,
        });
    }

    ConsistencyReport {
        readings,
        contrast_variance,
        warnings,
    }
}

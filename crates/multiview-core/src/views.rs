use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::frame::ColorFrame;

/// Viewpoint a generated image is meant to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewRole {
    Primary,
    LeftThreeQuarter,
    RightThreeQuarter,
    Back,
}

impl ViewRole {
    pub fn is_primary(self) -> bool {
        matches!(self, Self::Primary)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::LeftThreeQuarter => "left_three_quarter",
            Self::RightThreeQuarter => "right_three_quarter",
            Self::Back => "back",
        }
    }
}

impl fmt::Display for ViewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative description of one desired view. Static configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewSpec {
    pub role: ViewRole,
    /// Intended rotation around the vertical axis, degrees.
    pub rotation_degrees: f32,
    /// Transformation intent sent to the edit backend.
    pub prompt: String,
}

impl ViewSpec {
    pub fn new(role: ViewRole, rotation_degrees: f32, prompt: impl Into<String>) -> Self {
        Self {
            role,
            rotation_degrees,
            prompt: prompt.into(),
        }
    }
}

const PRESERVE_SUFFIX: &str = "while preserving exact colors, textures, proportions, and all \
     details. Clean neutral background. Maintain original quality and sharpness";

/// Primary, left three-quarter, right three-quarter, back.
pub fn default_view_specs() -> Vec<ViewSpec> {
    vec![
        ViewSpec::new(
            ViewRole::Primary,
            0.0,
            "Preserve exact colors, shapes, and all details. Only improve image quality and \
             remove background with neutral solid color. Keep the same viewing angle",
        ),
        ViewSpec::new(
            ViewRole::LeftThreeQuarter,
            -45.0,
            format!("Rotate object 45 degrees left {PRESERVE_SUFFIX}"),
        ),
        ViewSpec::new(
            ViewRole::RightThreeQuarter,
            45.0,
            format!("Rotate object 45 degrees right {PRESERVE_SUFFIX}"),
        ),
        ViewSpec::new(
            ViewRole::Back,
            180.0,
            format!("Show back view of object {PRESERVE_SUFFIX}"),
        ),
    ]
}

/// A generated view plus the provenance of every correction applied to it.
#[derive(Clone, Debug)]
pub struct ViewResult {
    pub role: ViewRole,
    pub image: ColorFrame,
    /// Per-channel (R, G, B) calibration factors actually applied.
    pub color_factors: [f64; 3],
    /// Uniform lighting-normalization factor actually applied.
    pub brightness_factor: f64,
    /// Whether every channel mean stayed within the validator threshold.
    pub variance_check_passed: bool,
    /// Edit backend round trip; `None` when no edit call was made.
    pub edit_elapsed: Option<Duration>,
    /// Calibrated edit as it was before background removal and lighting
    /// normalization; `None` when no edit call was made.
    pub edited: Option<ColorFrame>,
}

impl ViewResult {
    /// A view taken as-is, with identity corrections.
    pub fn unedited(role: ViewRole, image: ColorFrame) -> Self {
        Self {
            role,
            image,
            color_factors: [1.0; 3],
            brightness_factor: 1.0,
            variance_check_passed: true,
            edit_elapsed: None,
            edited: None,
        }
    }
}

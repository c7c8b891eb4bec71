use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CHANNEL_THRESHOLD, DEFAULT_CONTRAST_THRESHOLD, DEFAULT_CORRECTION_MAX,
    DEFAULT_CORRECTION_MIN,
};
use crate::enhance::EnhanceParams;
use crate::error::{MultiviewError, Result};
use crate::views::{default_view_specs, ViewRole, ViewSpec};

/// Process-wide, read-only configuration. Built once at start-up and passed
/// by reference into the pipeline and its components.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Use the enhanced input as the primary view instead of requesting an
    /// edit for it.
    #[serde(default = "default_true")]
    pub use_original_as_primary: bool,
    #[serde(default = "default_view_specs")]
    pub views: Vec<ViewSpec>,
    #[serde(default)]
    pub enhance: EnhanceParams,
    #[serde(default)]
    pub edit: EditConfig,
    #[serde(default)]
    pub background: BackgroundConfig,
    #[serde(default)]
    pub reconstruction: ReconstructionParams,
    #[serde(default)]
    pub correction: CorrectionBounds,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub backends: BackendConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_true() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            use_original_as_primary: true,
            views: default_view_specs(),
            enhance: EnhanceParams::default(),
            edit: EditConfig::default(),
            background: BackgroundConfig::default(),
            reconstruction: ReconstructionParams::default(),
            correction: CorrectionBounds::default(),
            validation: ValidationConfig::default(),
            backends: BackendConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Reject configurations the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.views.first() else {
            return Err(MultiviewError::Config("no views configured".into()));
        };
        if first.role != ViewRole::Primary {
            return Err(MultiviewError::Config(format!(
                "first view must be primary, found {}",
                first.role
            )));
        }
        let mut seen = HashSet::new();
        for spec in &self.views {
            if !seen.insert(spec.role) {
                return Err(MultiviewError::Config(format!(
                    "view role {} configured twice",
                    spec.role
                )));
            }
        }
        self.correction.validate()?;
        let thresholds = [
            self.validation.channel_threshold,
            self.validation.contrast_threshold,
        ];
        if thresholds.iter().any(|t| t.is_nan() || *t < 0.0) {
            return Err(MultiviewError::Config(
                "validation thresholds must be non-negative".into(),
            ));
        }
        if !self.edit.megapixels.is_finite() || self.edit.megapixels < 0.0 {
            return Err(MultiviewError::Config(
                "edit megapixels must be finite and non-negative".into(),
            ));
        }
        Ok(())
    }

    /// The primary view spec. `validate` guarantees it exists.
    pub fn primary_view(&self) -> Option<&ViewSpec> {
        self.views.first().filter(|spec| spec.role.is_primary())
    }

    /// Every configured view after the primary one, in order.
    pub fn complementary_views(&self) -> &[ViewSpec] {
        self.views.get(1..).unwrap_or(&[])
    }
}

/// Parameters sent with every edit request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    pub num_inference_steps: u32,
    pub guidance_scale: f32,
    pub negative_prompt: String,
    /// Input images are resampled to about this many megapixels
    /// (1 MP = 1024*1024) before upload. 0 disables resampling.
    pub megapixels: f64,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            num_inference_steps: 4,
            guidance_scale: 1.0,
            negative_prompt: "blurry, distorted, low quality, color shift, extra objects, \
                              watermark, text"
                .into(),
            megapixels: 1.0,
        }
    }
}

/// Background-removal request shaping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub enabled: bool,
    /// Edge length of the square output, pixels.
    pub output_size: u32,
    /// Fraction of the output left as padding around the subject.
    pub padding: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_size: 1024,
            padding: 0.1,
        }
    }
}

/// Quality knobs forwarded to the reconstruction backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionParams {
    pub sparse_structure_steps: u32,
    pub sparse_structure_cfg_strength: f32,
    pub slat_steps: u32,
    pub slat_cfg_strength: f32,
    pub num_oversamples: u32,
}

impl Default for ReconstructionParams {
    fn default() -> Self {
        Self {
            sparse_structure_steps: 8,
            sparse_structure_cfg_strength: 7.5,
            slat_steps: 12,
            slat_cfg_strength: 3.0,
            num_oversamples: 3,
        }
    }
}

impl ReconstructionParams {
    /// Configured defaults with any per-request overrides applied.
    pub fn overridden(&self, overrides: &ReconstructionOverrides) -> Self {
        Self {
            sparse_structure_steps: overrides
                .sparse_structure_steps
                .unwrap_or(self.sparse_structure_steps),
            sparse_structure_cfg_strength: overrides
                .sparse_structure_cfg_strength
                .unwrap_or(self.sparse_structure_cfg_strength),
            slat_steps: overrides.slat_steps.unwrap_or(self.slat_steps),
            slat_cfg_strength: overrides.slat_cfg_strength.unwrap_or(self.slat_cfg_strength),
            num_oversamples: overrides.num_oversamples.unwrap_or(self.num_oversamples),
        }
    }
}

/// Per-request replacements for individual reconstruction parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionOverrides {
    pub sparse_structure_steps: Option<u32>,
    pub sparse_structure_cfg_strength: Option<f32>,
    pub slat_steps: Option<u32>,
    pub slat_cfg_strength: Option<f32>,
    pub num_oversamples: Option<u32>,
}

/// Bounded multiplicative range for color and brightness corrections.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectionBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for CorrectionBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_CORRECTION_MIN,
            max: DEFAULT_CORRECTION_MAX,
        }
    }
}

impl CorrectionBounds {
    pub fn clamp(&self, factor: f64) -> f64 {
        factor.clamp(self.min, self.max)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min > 0.0 && self.min <= 1.0 && self.max >= 1.0) {
            return Err(MultiviewError::Config(format!(
                "correction bounds must satisfy 0 < min <= 1 <= max, got [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl fmt::Display for CorrectionBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}x-{:.2}x", self.min, self.max)
    }
}

/// Consistency check thresholds, both in 0-255 intensity units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub channel_threshold: f64,
    pub contrast_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            channel_threshold: DEFAULT_CHANNEL_THRESHOLD,
            contrast_threshold: DEFAULT_CONTRAST_THRESHOLD,
        }
    }
}

/// Endpoints and timeouts of the external services.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub edit_url: String,
    pub background_url: String,
    pub reconstruction_url: String,
    pub edit_timeout_secs: u64,
    pub background_timeout_secs: u64,
    pub reconstruction_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            edit_url: "http://127.0.0.1:8001/edit".into(),
            background_url: "http://127.0.0.1:8002/remove-background".into(),
            reconstruction_url: "http://127.0.0.1:8003/reconstruct".into(),
            edit_timeout_secs: 120,
            background_timeout_secs: 60,
            reconstruction_timeout_secs: 600,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the input, every final view and the artifact to `output_dir`.
    pub save_generated_files: bool,
    pub output_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_generated_files: false,
            output_dir: PathBuf::from("outputs"),
        }
    }
}

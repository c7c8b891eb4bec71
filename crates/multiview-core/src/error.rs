use thiserror::Error;

use crate::pipeline::PipelineStage;
use crate::views::ViewRole;

#[derive(Error, Debug)]
pub enum MultiviewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("View generation failed for {role}: {reason}")]
    ViewGeneration { role: ViewRole, reason: String },

    #[error("Only {survived} view(s) survived generation, at least {required} required")]
    InsufficientViews { survived: usize, required: usize },

    #[error("Reconstruction failed: {0}")]
    Reconstruction(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl MultiviewError {
    /// Pipeline stage a fatal error belongs to, for caller-facing classification.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::InvalidImage(_) | Self::InvalidDimensions { .. } | Self::ImageError(_) => {
                Some(PipelineStage::Enhance)
            }
            Self::ViewGeneration { role, .. } if role.is_primary() => {
                Some(PipelineStage::GeneratePrimary)
            }
            Self::ViewGeneration { .. } | Self::InsufficientViews { .. } => {
                Some(PipelineStage::GenerateComplementary)
            }
            Self::Reconstruction(_) => Some(PipelineStage::Reconstruct),
            Self::Io(_) | Self::Backend(_) | Self::Config(_) | Self::Cancelled => None,
        }
    }

    /// Role of the view that failed, if the error is tied to one.
    pub fn role(&self) -> Option<ViewRole> {
        match self {
            Self::ViewGeneration { role, .. } => Some(*role),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MultiviewError>;

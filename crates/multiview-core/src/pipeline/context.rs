use crate::frame::ColorFrame;
use crate::views::{ViewResult, ViewRole};

use super::types::DroppedView;

/// Mutable state of one request, owned by the orchestrator and discarded
/// when the request ends. Never shared between requests.
pub(super) struct GenerationContext {
    pub original: ColorFrame,
    pub enhanced: ColorFrame,
    pub seed: u64,
    /// Surviving views in submission order.
    pub views: Vec<ViewResult>,
    pub dropped: Vec<DroppedView>,
}

impl GenerationContext {
    pub fn new(original: ColorFrame, enhanced: ColorFrame, seed: u64) -> Self {
        Self {
            original,
            enhanced,
            seed,
            views: Vec::new(),
            dropped: Vec::new(),
        }
    }

    pub fn drop_view(&mut self, role: ViewRole, reason: String) {
        self.dropped.push(DroppedView { role, reason });
    }

    pub fn view_images(&self) -> Vec<&ColorFrame> {
        self.views.iter().map(|v| &v.image).collect()
    }
}

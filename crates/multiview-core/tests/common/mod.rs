use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ndarray::Array2;

use multiview_core::backend::{
    BackgroundRemover, BackgroundRequest, EditBackend, EditRequest, ReconstructionBackend,
    ReconstructionRequest, ReconstructionResult,
};
use multiview_core::error::{MultiviewError, Result};
use multiview_core::frame::{ColorFrame, Frame};
use multiview_core::pipeline::config::{PipelineConfig, ReconstructionParams};

// ---------------------------------------------------------------------------
// Image builders
// ---------------------------------------------------------------------------

/// Uniform image with channel values in 0-255 units.
pub fn solid(w: usize, h: usize, rgb: [u8; 3]) -> ColorFrame {
    ColorFrame::filled(w, h, rgb)
}

/// Black/white checkerboard on every channel (mean 127.5, std 127.5).
pub fn checkerboard(w: usize, h: usize) -> ColorFrame {
    let plane = || {
        Frame::new(Array2::from_shape_fn((h, w), |(r, c)| {
            if (r + c) % 2 == 0 {
                0.0
            } else {
                1.0
            }
        }))
    };
    ColorFrame {
        red: plane(),
        green: plane(),
        blue: plane(),
    }
}

/// Horizontal gradient with distinct per-channel offsets.
pub fn gradient(w: usize, h: usize) -> ColorFrame {
    let plane = |offset: f32| {
        Frame::new(Array2::from_shape_fn((h, w), |(_, c)| {
            (offset + 0.5 * c as f32 / w as f32).clamp(0.0, 1.0)
        }))
    };
    ColorFrame {
        red: plane(0.4),
        green: plane(0.2),
        blue: plane(0.1),
    }
}

/// Configuration suited to small synthetic images: no megapixel resampling.
pub fn test_config() -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.edit.megapixels = 0.0;
    config
}

// ---------------------------------------------------------------------------
// Scripted backends
// ---------------------------------------------------------------------------

type EditFn = dyn Fn(&EditRequest<'_>) -> Result<ColorFrame> + Send + Sync;

/// Edit backend driven by a closure; records every prompt and seed it sees.
pub struct ScriptedEdit {
    script: Box<EditFn>,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<(String, u64)>>,
}

impl ScriptedEdit {
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(&EditRequest<'_>) -> Result<ColorFrame> + Send + Sync + 'static,
    {
        Arc::new(Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Returns the request image unchanged.
    pub fn echo() -> Arc<Self> {
        Self::new(|req| Ok(req.image.clone()))
    }

    /// Fails every request whose prompt contains one of `needles`.
    pub fn failing_on(needles: &'static [&'static str]) -> Arc<Self> {
        Self::new(move |req| {
            if needles.iter().any(|n| req.prompt.contains(n)) {
                Err(MultiviewError::Backend("edit backend returned 500".into()))
            } else {
                Ok(req.image.clone())
            }
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EditBackend for ScriptedEdit {
    fn name(&self) -> &str {
        "scripted-edit"
    }

    fn edit(&self, request: &EditRequest<'_>) -> Result<ColorFrame> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((request.prompt.to_string(), request.seed));
        (self.script)(request)
    }
}

/// Background remover that passes images through, optionally failing every
/// call after the first `succeed_first` calls.
pub struct PassthroughBackground {
    pub calls: AtomicUsize,
    succeed_first: Option<usize>,
}

impl PassthroughBackground {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            succeed_first: None,
        })
    }

    /// Fails every call.
    pub fn failing() -> Arc<Self> {
        Self::failing_after(0)
    }

    /// Passes the first `n` calls through and fails every later one.
    pub fn failing_after(n: usize) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            succeed_first: Some(n),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BackgroundRemover for PassthroughBackground {
    fn name(&self) -> &str {
        "passthrough-background"
    }

    fn remove_background(&self, request: &BackgroundRequest<'_>) -> Result<ColorFrame> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.succeed_first {
            Some(limit) if n >= limit => {
                Err(MultiviewError::Backend("background service unavailable".into()))
            }
            _ => Ok(request.image.clone()),
        }
    }
}

/// What the reconstruction backend was asked to do.
#[derive(Clone, Debug)]
pub struct RecordedReconstruction {
    pub view_count: usize,
    pub brightness: Vec<f64>,
    pub seed: u64,
    pub params: ReconstructionParams,
}

pub struct RecordingReconstruction {
    artifact: std::result::Result<Vec<u8>, String>,
    pub requests: Mutex<Vec<RecordedReconstruction>>,
}

impl RecordingReconstruction {
    pub fn returning(artifact: &[u8]) -> Arc<Self> {
        Arc::new(Self {
            artifact: Ok(artifact.to_vec()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            artifact: Err(reason.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn last(&self) -> Option<RecordedReconstruction> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl ReconstructionBackend for RecordingReconstruction {
    fn name(&self) -> &str {
        "recording-reconstruction"
    }

    fn reconstruct(&self, request: &ReconstructionRequest<'_>) -> Result<ReconstructionResult> {
        self.requests.lock().unwrap().push(RecordedReconstruction {
            view_count: request.images.len(),
            brightness: request.images.iter().map(|img| img.brightness()).collect(),
            seed: request.seed,
            params: request.params.clone(),
        });
        match &self.artifact {
            Ok(bytes) => Ok(ReconstructionResult {
                artifact: bytes.clone(),
                elapsed: None,
            }),
            Err(reason) => Err(MultiviewError::Backend(reason.clone())),
        }
    }
}

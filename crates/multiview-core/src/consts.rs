/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Small epsilon to avoid division by zero in floating-point comparisons.
pub const EPSILON: f64 = 1e-10;

/// Channel statistics are reported on the 8-bit intensity scale.
pub const INTENSITY_SCALE: f64 = 255.0;

/// ITU-R 601-2 luma coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.299;

/// ITU-R 601-2 luma coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.587;

/// ITU-R 601-2 luma coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.114;

/// Window size of the denoising median filter.
pub const DENOISE_WINDOW: usize = 3;

/// Sharpness boost applied after denoising (1.0 = unchanged).
pub const SHARPNESS_FACTOR: f32 = 1.15;

/// Contrast boost applied by the enhancer.
pub const CONTRAST_FACTOR: f32 = 1.10;

/// Saturation boost applied by the enhancer.
pub const SATURATION_FACTOR: f32 = 1.05;

/// Lower bound of the multiplicative color/brightness correction.
pub const DEFAULT_CORRECTION_MIN: f64 = 0.8;

/// Upper bound of the multiplicative color/brightness correction.
pub const DEFAULT_CORRECTION_MAX: f64 = 1.2;

/// Per-channel mean deviation (0-255 units) above which a view is flagged.
pub const DEFAULT_CHANNEL_THRESHOLD: f64 = 50.0;

/// Cross-view contrast variance above which the view set is flagged.
pub const DEFAULT_CONTRAST_THRESHOLD: f64 = 40.0;

/// Reconstruction needs at least this many viewpoints.
pub const MIN_VIEWS_FOR_RECONSTRUCTION: usize = 2;

/// Upper bound (inclusive) for randomly resolved seeds.
pub const MAX_RANDOM_SEED: u32 = 10_000;

/// Seed and edge length of the warm-up request.
pub const WARMUP_SEED: i64 = 42;
pub const WARMUP_SIZE: usize = 64;

use crate::frame::{ColorFrame, Frame};

use super::build_pixels;

/// 3x3 smoothing kernel weights; the centre weight dominates.
const SMOOTH_KERNEL: [[f32; 3]; 3] = [[1.0, 1.0, 1.0], [1.0, 5.0, 1.0], [1.0, 1.0, 1.0]];
const SMOOTH_KERNEL_SUM: f32 = 13.0;

/// Adjust sharpness by extrapolating away from a smoothed copy.
///
/// `factor` 1.0 leaves the frame unchanged, values above 1.0 sharpen and
/// values below 1.0 soften. The one-pixel border is not smoothed, so it is
/// left as is. Results saturate to [0.0, 1.0].
pub fn adjust_sharpness(frame: &Frame, factor: f32) -> Frame {
    let (h, w) = frame.data.dim();
    let data = &frame.data;

    let out = build_pixels(h, w, |row, col| {
        let orig = data[[row, col]];
        if row == 0 || col == 0 || row + 1 >= h || col + 1 >= w {
            return orig;
        }
        let mut sum = 0.0f32;
        for (ky, kernel_row) in SMOOTH_KERNEL.iter().enumerate() {
            for (kx, &kv) in kernel_row.iter().enumerate() {
                sum += data[[row + ky - 1, col + kx - 1]] * kv;
            }
        }
        let smooth = sum / SMOOTH_KERNEL_SUM;
        (smooth + (orig - smooth) * factor).clamp(0.0, 1.0)
    });

    Frame::new(out)
}

pub fn adjust_sharpness_color(color: &ColorFrame, factor: f32) -> ColorFrame {
    color.map_channels(|f| adjust_sharpness(f, factor))
}

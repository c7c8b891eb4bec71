use crate::frame::{ColorFrame, Frame};

use super::{build_pixels, clamp_index};

/// Median filter over a square `size`x`size` window.
///
/// Borders replicate the nearest edge pixel. `size` is rounded up to the
/// next odd number; a size of 1 or less returns an unchanged copy.
pub fn median_filter(frame: &Frame, size: usize) -> Frame {
    if size <= 1 {
        return frame.clone();
    }
    let radius = (size / 2) as isize;
    let window = (2 * radius + 1) as usize;
    let (h, w) = frame.data.dim();
    let data = &frame.data;

    let filtered = build_pixels(h, w, |row, col| {
        let mut values = Vec::with_capacity(window * window);
        for dy in -radius..=radius {
            let r = clamp_index(row as isize + dy, h);
            for dx in -radius..=radius {
                let c = clamp_index(col as isize + dx, w);
                values.push(data[[r, c]]);
            }
        }
        compute_median(&mut values)
    });

    Frame::new(filtered)
}

/// Median filter applied to each channel independently.
pub fn median_filter_color(color: &ColorFrame, size: usize) -> ColorFrame {
    color.map_channels(|f| median_filter(f, size))
}

/// O(n) median using `select_nth_unstable_by`. Odd-length input only.
fn compute_median(values: &mut [f32]) -> f32 {
    let mid = values.len() / 2;
    let (_, median, _) = values.select_nth_unstable_by(mid, |a, b| a.total_cmp(b));
    *median
}

pub mod levels;
pub mod median;
pub mod resample;
pub mod sharpness;

use ndarray::Array2;
use rayon::prelude::*;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// Build an (h, w) array by evaluating `pixel_fn(row, col)` for every pixel.
///
/// Rows are evaluated in parallel once the image reaches
/// `PARALLEL_PIXEL_THRESHOLD` pixels; smaller images stay sequential.
pub(crate) fn build_pixels<F>(h: usize, w: usize, pixel_fn: F) -> Array2<f32>
where
    F: Fn(usize, usize) -> f32 + Sync,
{
    let mut result = Array2::<f32>::zeros((h, w));

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let rows: Vec<Vec<f32>> = (0..h)
            .into_par_iter()
            .map(|row| (0..w).map(|col| pixel_fn(row, col)).collect())
            .collect();
        for (row, row_data) in rows.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                result[[row, col]] = val;
            }
        }
    } else {
        for row in 0..h {
            for col in 0..w {
                result[[row, col]] = pixel_fn(row, col);
            }
        }
    }

    result
}

/// Clamp a signed coordinate into `0..len`, replicating edge pixels.
#[inline]
pub(crate) fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

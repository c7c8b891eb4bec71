use ndarray::Array2;

use crate::frame::{ColorFrame, Frame};

use super::build_pixels;

/// Bilinear resample of a single channel to `(width, height)`.
///
/// Sample positions use pixel-centre alignment so that resampling to the
/// same size is the identity.
pub fn resample(frame: &Frame, width: usize, height: usize) -> Frame {
    let (h, w) = frame.data.dim();
    if (h, w) == (height, width) {
        return frame.clone();
    }
    if h == 0 || w == 0 || width == 0 || height == 0 {
        return Frame::new(Array2::zeros((height, width)));
    }

    let sy = h as f32 / height as f32;
    let sx = w as f32 / width as f32;
    let data = &frame.data;

    let out = build_pixels(height, width, |row, col| {
        let y = ((row as f32 + 0.5) * sy - 0.5).clamp(0.0, (h - 1) as f32);
        let x = ((col as f32 + 0.5) * sx - 0.5).clamp(0.0, (w - 1) as f32);
        let y0 = y.floor() as usize;
        let x0 = x.floor() as usize;
        let y1 = (y0 + 1).min(h - 1);
        let x1 = (x0 + 1).min(w - 1);
        let fy = y - y0 as f32;
        let fx = x - x0 as f32;

        let top = data[[y0, x0]] * (1.0 - fx) + data[[y0, x1]] * fx;
        let bottom = data[[y1, x0]] * (1.0 - fx) + data[[y1, x1]] * fx;
        top * (1.0 - fy) + bottom * fy
    });

    Frame::new(out)
}

pub fn resample_color(color: &ColorFrame, width: usize, height: usize) -> ColorFrame {
    color.map_channels(|f| resample(f, width, height))
}

/// Dimensions that bring `(width, height)` to roughly `megapixels` million
/// pixels (in units of 1024*1024) while keeping the aspect ratio.
pub fn dimensions_for_megapixels(width: usize, height: usize, megapixels: f64) -> (usize, usize) {
    if width == 0 || height == 0 || megapixels <= 0.0 {
        return (width, height);
    }
    let total = megapixels * 1024.0 * 1024.0;
    let scale = (total / (width * height) as f64).sqrt();
    let w = ((width as f64 * scale).round() as usize).max(1);
    let h = ((height as f64 * scale).round() as usize).max(1);
    (w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resample_same_size_is_identity() {
        let data = Array2::from_shape_fn((4, 5), |(r, c)| (r * 5 + c) as f32 / 20.0);
        let frame = Frame::new(data.clone());
        assert_eq!(resample(&frame, 5, 4).data, data);
    }

    #[test]
    fn test_resample_uniform_stays_uniform() {
        let frame = Frame::new(Array2::from_elem((8, 8), 0.4f32));
        let out = resample(&frame, 3, 5);
        assert_eq!(out.data.dim(), (5, 3));
        assert!(out.data.iter().all(|v| (v - 0.4).abs() < 1e-6));
    }

    #[test]
    fn test_megapixel_dimensions_keep_aspect() {
        let (w, h) = dimensions_for_megapixels(2048, 1024, 1.0);
        assert_eq!((w, h), (1448, 724));
    }
}

use crate::frame::{ColorFrame, Frame};

/// Scale contrast around the mean luminance of the whole image.
///
/// `factor` 1.0 = no change, >1.0 spreads values away from the mean grey.
/// Results saturate to [0.0, 1.0].
pub fn adjust_contrast(color: &ColorFrame, factor: f32) -> ColorFrame {
    let mean_grey = color.luminance().mean() as f32 / 255.0;
    color.map_channels(|f| {
        Frame::new(
            f.data
                .mapv(|v| (mean_grey + (v - mean_grey) * factor).clamp(0.0, 1.0)),
        )
    })
}

/// Scale saturation by blending each pixel against its own luminance.
///
/// `factor` 0.0 yields greyscale, 1.0 = no change, >1.0 boosts color.
pub fn adjust_saturation(color: &ColorFrame, factor: f32) -> ColorFrame {
    let grey = color.luminance();
    let blend = |channel: &Frame| {
        let data = ndarray::Zip::from(&channel.data)
            .and(&grey.data)
            .map_collect(|&v, &l| (l + (v - l) * factor).clamp(0.0, 1.0));
        Frame::new(data)
    };
    ColorFrame {
        red: blend(&color.red),
        green: blend(&color.green),
        blue: blend(&color.blue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturation_leaves_grey_untouched() {
        let grey = ColorFrame::filled(4, 4, [90, 90, 90]);
        let out = adjust_saturation(&grey, 1.5);
        for (a, b) in out.red.data.iter().zip(grey.red.data.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_contrast_never_leaves_valid_range() {
        let mut color = ColorFrame::filled(4, 4, [0, 128, 255]);
        color.red.data[[0, 0]] = 1.0;
        let out = adjust_contrast(&color, 3.0);
        for ch in [&out.red, &out.green, &out.blue] {
            assert!(ch.data.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}

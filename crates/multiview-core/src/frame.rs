use std::fmt;

use image::{Rgb, RgbImage};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::consts::{INTENSITY_SCALE, LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};
use crate::error::{MultiviewError, Result};

/// A single image channel.
/// Pixel values are f32 in [0.0, 1.0].
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f32>,
}

impl Frame {
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Mean intensity on the 0-255 scale.
    pub fn mean(&self) -> f64 {
        let n = self.data.len();
        if n == 0 {
            return 0.0;
        }
        let sum: f64 = self.data.iter().map(|&v| v as f64).sum();
        sum / n as f64 * INTENSITY_SCALE
    }

    /// Population standard deviation on the 0-255 scale.
    pub fn std_dev(&self) -> f64 {
        let n = self.data.len();
        if n == 0 {
            return 0.0;
        }
        let mean = self.mean() / INTENSITY_SCALE;
        let var: f64 = self
            .data
            .iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n as f64;
        var.sqrt() * INTENSITY_SCALE
    }

    /// Multiply every pixel by `factor`, saturating to [0.0, 1.0].
    pub fn scaled(&self, factor: f64) -> Frame {
        let factor = factor as f32;
        Frame::new(self.data.mapv(|v| (v * factor).clamp(0.0, 1.0)))
    }
}

/// One color channel of an RGB image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    pub fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Blue => write!(f, "blue"),
        }
    }
}

/// Color image composed of separate channel frames.
///
/// Every processing step in the crate returns a new `ColorFrame`; inputs are
/// never modified, so the original stays available for comparison.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorFrame {
    pub red: Frame,
    pub green: Frame,
    pub blue: Frame,
}

impl ColorFrame {
    /// Build from three planes, rejecting empty or mismatched channels.
    pub fn new(red: Frame, green: Frame, blue: Frame) -> Result<Self> {
        let color = Self { red, green, blue };
        color.validate()?;
        Ok(color)
    }

    /// Uniformly colored image, with channel values given in 0-255 units.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let plane = |v: u8| Frame::new(Array2::from_elem((height, width), v as f32 / 255.0));
        Self {
            red: plane(rgb[0]),
            green: plane(rgb[1]),
            blue: plane(rgb[2]),
        }
    }

    pub fn from_rgb_image(img: &RgbImage) -> Result<Self> {
        let (w, h) = img.dimensions();
        let (w, h) = (w as usize, h as usize);
        if w == 0 || h == 0 {
            return Err(MultiviewError::InvalidDimensions {
                width: w,
                height: h,
            });
        }

        let mut red = Array2::<f32>::zeros((h, w));
        let mut green = Array2::<f32>::zeros((h, w));
        let mut blue = Array2::<f32>::zeros((h, w));
        for (col, row, pixel) in img.enumerate_pixels() {
            let (row, col) = (row as usize, col as usize);
            red[[row, col]] = pixel.0[0] as f32 / 255.0;
            green[[row, col]] = pixel.0[1] as f32 / 255.0;
            blue[[row, col]] = pixel.0[2] as f32 / 255.0;
        }

        Ok(Self {
            red: Frame::new(red),
            green: Frame::new(green),
            blue: Frame::new(blue),
        })
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let mut img = RgbImage::new(self.width() as u32, self.height() as u32);
        for (col, row, pixel) in img.enumerate_pixels_mut() {
            let idx = [row as usize, col as usize];
            *pixel = Rgb([
                to_u8(self.red.data[idx]),
                to_u8(self.green.data[idx]),
                to_u8(self.blue.data[idx]),
            ]);
        }
        img
    }

    pub fn width(&self) -> usize {
        self.red.width()
    }

    pub fn height(&self) -> usize {
        self.red.height()
    }

    /// Fails with `InvalidDimensions` on a zero-sized image and
    /// `InvalidImage` when channel shapes disagree.
    pub fn validate(&self) -> Result<()> {
        let (h, w) = self.red.data.dim();
        if h == 0 || w == 0 {
            return Err(MultiviewError::InvalidDimensions {
                width: w,
                height: h,
            });
        }
        if self.green.data.dim() != (h, w) || self.blue.data.dim() != (h, w) {
            return Err(MultiviewError::InvalidImage(format!(
                "channel shapes differ: red {:?}, green {:?}, blue {:?}",
                self.red.data.dim(),
                self.green.data.dim(),
                self.blue.data.dim()
            )));
        }
        Ok(())
    }

    pub fn channel(&self, channel: Channel) -> &Frame {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }

    /// Per-channel means (R, G, B) on the 0-255 scale.
    pub fn channel_means(&self) -> [f64; 3] {
        [self.red.mean(), self.green.mean(), self.blue.mean()]
    }

    /// Per-channel standard deviations (R, G, B) on the 0-255 scale.
    pub fn channel_std_devs(&self) -> [f64; 3] {
        [self.red.std_dev(), self.green.std_dev(), self.blue.std_dev()]
    }

    /// Scalar brightness: the mean of the three channel means.
    pub fn brightness(&self) -> f64 {
        self.channel_means().iter().sum::<f64>() / 3.0
    }

    /// Apply a processing function to each channel independently.
    pub fn map_channels<F>(&self, mut process_fn: F) -> ColorFrame
    where
        F: FnMut(&Frame) -> Frame,
    {
        ColorFrame {
            red: process_fn(&self.red),
            green: process_fn(&self.green),
            blue: process_fn(&self.blue),
        }
    }

    /// Multiply each channel by its own factor, saturating to the valid range.
    pub fn scale_channels(&self, factors: [f64; 3]) -> ColorFrame {
        ColorFrame {
            red: self.red.scaled(factors[0]),
            green: self.green.scaled(factors[1]),
            blue: self.blue.scaled(factors[2]),
        }
    }

    /// ITU-R 601-2 luma plane, used as the grey reference for contrast and
    /// saturation adjustments.
    pub fn luminance(&self) -> Frame {
        let data = ndarray::Zip::from(&self.red.data)
            .and(&self.green.data)
            .and(&self.blue.data)
            .map_collect(|&r, &g, &b| LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b);
        Frame::new(data)
    }
}

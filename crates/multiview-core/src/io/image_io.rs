use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;

use crate::error::Result;
use crate::frame::ColorFrame;

/// Load any supported image file as RGB.
pub fn load_image(path: &Path) -> Result<ColorFrame> {
    let img = image::open(path)?;
    ColorFrame::from_rgb_image(&img.to_rgb8())
}

/// Decode an in-memory image (any supported format) as RGB.
pub fn decode_image(bytes: &[u8]) -> Result<ColorFrame> {
    let img = image::load_from_memory(bytes)?;
    ColorFrame::from_rgb_image(&img.to_rgb8())
}

/// Encode as 8-bit RGB PNG.
pub fn encode_png(color: &ColorFrame) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    color.to_rgb_image().write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Save as 8-bit RGB PNG.
pub fn save_png(color: &ColorFrame, path: &Path) -> Result<()> {
    color
        .to_rgb_image()
        .save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

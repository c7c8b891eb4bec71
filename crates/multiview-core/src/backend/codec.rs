use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::{MultiviewError, Result};
use crate::frame::ColorFrame;
use crate::io::image_io::{decode_image, encode_png};

/// PNG-encode and base64 the image for a JSON body.
pub fn image_to_base64(color: &ColorFrame) -> Result<String> {
    Ok(BASE64.encode(encode_png(color)?))
}

/// Decode a base64 image field from a backend reply.
pub fn image_from_base64(data: &str, service: &str) -> Result<ColorFrame> {
    let bytes = bytes_from_base64(data, service)?;
    decode_image(&bytes)
        .map_err(|e| MultiviewError::Backend(format!("{service} returned an unreadable image: {e}")))
}

pub fn bytes_from_base64(data: &str, service: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(data.trim().as_bytes())
        .map_err(|e| MultiviewError::Backend(format!("{service} base64 decode failed: {e}")))
}

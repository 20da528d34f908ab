//! Data URL codec for raster payloads.
//!
//! Images cross every context boundary as `data:<mime>;base64,<payload>`
//! strings, so they travel as plain JSON without binary transfer machinery.

use super::CompositeError;
use base64::Engine;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

const PNG_PREFIX: &str = "data:image/png;base64,";

/// Decodes a base64 data URL into an RGBA raster.
///
/// Any raster format the `image` crate can sniff is accepted; the declared
/// mime type is only checked for being an image.
pub fn decode(data_url: &str) -> Result<RgbaImage, CompositeError> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| CompositeError::MalformedDataUrl("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| CompositeError::MalformedDataUrl("missing payload separator".to_string()))?;

    let mut parts = header.split(';');
    let mime = parts.next().unwrap_or_default();
    if !mime.starts_with("image/") {
        return Err(CompositeError::MalformedDataUrl(format!(
            "unsupported media type '{}'",
            mime
        )));
    }
    if !parts.any(|p| p.eq_ignore_ascii_case("base64")) {
        return Err(CompositeError::MalformedDataUrl(
            "payload is not base64 encoded".to_string(),
        ));
    }

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim().as_bytes())
        .map_err(|e| CompositeError::MalformedDataUrl(format!("base64 decode failed: {}", e)))?;

    let image =
        image::load_from_memory(&bytes).map_err(|e| CompositeError::DecodeFailed(e.to_string()))?;
    Ok(image.to_rgba8())
}

/// Encodes a raster as a PNG data URL.
pub fn encode_png(image: &RgbaImage) -> Result<String, CompositeError> {
    let mut png_bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| CompositeError::EncodingFailed(e.to_string()))?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&png_bytes);
    Ok(format!("{}{}", PNG_PREFIX, encoded))
}

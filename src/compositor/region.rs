//! Region cropping — functional core.
//!
//! No infrastructure here: pixels in, pixels out.

use super::CompositeError;
use crate::types::CaptureArea;
use image::{imageops, RgbaImage};

/// Crops a raw viewport capture to `area`.
///
/// The area is measured in CSS pixels while the capture is in physical
/// pixels, so every edge is scaled by the area's device pixel ratio first.
/// The output is always exactly the scaled size; any part of the scaled
/// rectangle that falls outside the source stays transparent, the same way
/// a canvas blit would leave it.
pub fn crop(image: &RgbaImage, area: &CaptureArea) -> Result<RgbaImage, CompositeError> {
    let rect = area.to_pixels().ok_or(CompositeError::InvalidArea {
        x: area.x,
        y: area.y,
        width: area.width,
        height: area.height,
    })?;

    let mut out = RgbaImage::new(rect.width, rect.height);

    let (img_width, img_height) = image.dimensions();
    if rect.x < img_width && rect.y < img_height {
        let visible_w = rect.width.min(img_width - rect.x);
        let visible_h = rect.height.min(img_height - rect.y);
        let source = imageops::crop_imm(image, rect.x, rect.y, visible_w, visible_h).to_image();
        imageops::replace(&mut out, &source, 0, 0);
    } else {
        log::warn!(
            "[COMPOSITOR] Crop origin ({},{}) lies outside the {}x{} capture",
            rect.x,
            rect.y,
            img_width,
            img_height
        );
    }

    Ok(out)
}

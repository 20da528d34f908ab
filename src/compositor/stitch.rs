//! Vertical stitching of scrolled viewport captures into one page image.

use super::CompositeError;
use crate::types::PageDimensions;
use image::{imageops, RgbaImage};

/// Stitches an ordered run of viewport captures into a single page image.
///
/// Output is `first.width − scrollbar·dpr` wide (the scrollbar column is cut
/// off every capture) and `pageHeight·dpr` tall. Captures are laid down top
/// to bottom; the cursor advances by each capture's full height while only
/// the drawn strip is clamped to the remaining canvas. The last capture was
/// taken at the bottom-aligned scroll position, so its strip is read from
/// its bottom edge instead of its top.
pub fn stitch(images: &[RgbaImage], dims: &PageDimensions) -> Result<RgbaImage, CompositeError> {
    let first = images.first().ok_or(CompositeError::NoCaptures)?;

    let dpr = dims.scale();
    let scrollbar_px = (dims.scrollbar_width as f64 * dpr).round() as u32;
    let final_width = first
        .width()
        .checked_sub(scrollbar_px)
        .filter(|w| *w > 0)
        .ok_or(CompositeError::ScrollbarExceedsWidth {
            scrollbar: scrollbar_px,
            image_width: first.width(),
        })?;
    let final_height = (dims.page_height as f64 * dpr).round() as u32;
    if final_height == 0 {
        return Err(CompositeError::ZeroDimension);
    }

    let mut canvas = RgbaImage::new(final_width, final_height);
    let last = images.len() - 1;
    let mut current_y: u64 = 0;

    for (index, image) in images.iter().enumerate() {
        if image.width() < final_width {
            return Err(CompositeError::MismatchedWidth {
                index,
                width: image.width(),
                expected: final_width,
            });
        }

        let image_height = image.height() as u64;
        let remaining = (final_height as u64).saturating_sub(current_y);
        let draw_height = image_height.min(remaining);

        if draw_height > 0 {
            let source_y = if index == last {
                image_height - draw_height
            } else {
                0
            };
            let strip = imageops::crop_imm(
                image,
                0,
                source_y as u32,
                final_width,
                draw_height as u32,
            )
            .to_image();
            imageops::replace(&mut canvas, &strip, 0, current_y as i64);
        }

        current_y += image_height;
    }

    log::debug!(
        "[COMPOSITOR] Stitched {} captures into {}x{}",
        images.len(),
        final_width,
        final_height
    );
    Ok(canvas)
}

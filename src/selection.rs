//! Selection overlay — drag state machine for area captures.
//!
//! The same rules `probe/js/selection_overlay.js` applies in the page, for
//! hosts that draw their own overlay: the user presses, drags and releases,
//! and the overlay reports a normalized rectangle back to the driver as a
//! `captureSelectedArea` request. Dragging up or left is fine;
//! the box is always reported with a positive width and height.

use crate::messages::Message;
use crate::types::CaptureArea;

/// The rubber-band rectangle as currently drawn, in viewport CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionBox {
    fn spanning(anchor: (f64, f64), point: (f64, f64)) -> Self {
        Self {
            left: anchor.0.min(point.0),
            top: anchor.1.min(point.1),
            width: (point.0 - anchor.0).abs(),
            height: (point.1 - anchor.1).abs(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionOverlay {
    device_pixel_ratio: f64,
    anchor: Option<(f64, f64)>,
    current: Option<SelectionBox>,
}

impl SelectionOverlay {
    pub fn new(device_pixel_ratio: f64) -> Self {
        let device_pixel_ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        Self {
            device_pixel_ratio,
            anchor: None,
            current: None,
        }
    }

    /// Whether a drag is in progress.
    pub fn is_drawing(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn current_box(&self) -> Option<SelectionBox> {
        self.current
    }

    /// Mouse down: start a new rectangle at the pointer.
    pub fn press(&mut self, x: f64, y: f64) {
        self.anchor = Some((x, y));
        self.current = Some(SelectionBox::spanning((x, y), (x, y)));
    }

    /// Mouse move: stretch the rectangle. Ignored when no drag is active.
    pub fn drag(&mut self, x: f64, y: f64) -> Option<SelectionBox> {
        let anchor = self.anchor?;
        let rect = SelectionBox::spanning(anchor, (x, y));
        self.current = Some(rect);
        Some(rect)
    }

    /// Mouse up: finish the drag and produce the area to capture.
    ///
    /// Coordinates are truncated to whole CSS pixels. Returns `None` when no
    /// drag was active or the rectangle has no area (a plain click).
    pub fn release(&mut self, x: f64, y: f64) -> Option<CaptureArea> {
        let anchor = self.anchor.take()?;
        let rect = SelectionBox::spanning(anchor, (x, y));
        self.current = None;

        let area = CaptureArea {
            x: rect.left.trunc(),
            y: rect.top.trunc(),
            width: rect.width.trunc(),
            height: rect.height.trunc(),
            device_pixel_ratio: self.device_pixel_ratio,
        };
        if area.width <= 0.0 || area.height <= 0.0 {
            log::info!("[SELECTION] Empty selection at ({},{}), nothing to capture", area.x, area.y);
            return None;
        }
        Some(area)
    }
}

/// The request the overlay sends once the user has chosen an area.
pub fn report(area: CaptureArea) -> Message {
    Message::CaptureSelectedArea { area }
}

//! Shared capture types — areas, page geometry, tab ids, results.
//!
//! These cross every context boundary (driver ↔ page ↔ compositor ↔
//! presentation surface), so they all serialize with camelCase field names
//! to match the JSON the page scripts produce.

use serde::{Deserialize, Serialize};

/// Identifier of a browser tab or presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i32);

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tab#{}", self.0)
    }
}

/// Which trigger started a session. Used for logging and failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CaptureMode {
    Visible,
    SelectedArea,
    FullPage,
    /// A crop completion that arrived as a message. Visible and
    /// selected-area captures both crop, so the trigger is unknown.
    Crop,
}

impl std::fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CaptureMode::Visible => "visible",
            CaptureMode::SelectedArea => "selected-area",
            CaptureMode::FullPage => "full-page",
            CaptureMode::Crop => "crop",
        };
        f.write_str(name)
    }
}

/// A region to crop from a raw viewport capture, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "unit_ratio")]
    pub device_pixel_ratio: f64,
}

/// A [`CaptureArea`] converted to physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureArea {
    /// The whole viewport, as used by visible-area captures.
    pub fn viewport(geometry: &ViewportGeometry) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: geometry.width as f64,
            height: geometry.height as f64,
            device_pixel_ratio: geometry.device_pixel_ratio,
        }
    }

    /// Effective scale: a missing, zero or nonsensical ratio counts as 1.
    pub fn scale(&self) -> f64 {
        sanitize_ratio(self.device_pixel_ratio)
    }

    /// Scale to physical pixels, rounding each edge independently.
    ///
    /// Returns `None` when the area is degenerate: non-finite values,
    /// a negative origin, or a width/height that rounds to zero.
    pub fn to_pixels(&self) -> Option<PixelRect> {
        let dpr = self.scale();
        let values = [self.x, self.y, self.width, self.height];
        if values.iter().any(|v| !v.is_finite()) || self.x < 0.0 || self.y < 0.0 {
            return None;
        }

        let rect = PixelRect {
            x: (self.x * dpr).round() as u32,
            y: (self.y * dpr).round() as u32,
            width: (self.width * dpr).round().max(0.0) as u32,
            height: (self.height * dpr).round().max(0.0) as u32,
        };
        if rect.width == 0 || rect.height == 0 {
            return None;
        }
        Some(rect)
    }
}

/// Visible viewport size excluding the vertical scrollbar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportGeometry {
    pub width: u32,
    pub height: u32,
    #[serde(default = "unit_ratio")]
    pub device_pixel_ratio: f64,
}

/// Page geometry measured once when a full-page session starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDimensions {
    pub page_height: u32,
    pub viewport_height: u32,
    pub scrollbar_width: u32,
    #[serde(default = "unit_ratio")]
    pub device_pixel_ratio: f64,
}

impl PageDimensions {
    pub fn scale(&self) -> f64 {
        sanitize_ratio(self.device_pixel_ratio)
    }

    /// Scroll targets for one full-page pass.
    ///
    /// The cursor advances a viewport at a time while it is above the page
    /// height; each target is clamped to the bottom-aligned viewport so the
    /// last shot always reaches the end of the page (possibly overlapping
    /// the previous one).
    pub fn scroll_offsets(&self) -> Vec<u32> {
        if self.viewport_height == 0 {
            return Vec::new();
        }
        let bottom = self.page_height.saturating_sub(self.viewport_height);
        (0..self.page_height)
            .step_by(self.viewport_height as usize)
            .map(|y| y.min(bottom))
            .collect()
    }
}

/// A finished composite waiting for its presentation surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeResult {
    pub data_url: String,
    pub title: String,
}

fn unit_ratio() -> f64 {
    1.0
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(page_height: u32, viewport_height: u32) -> PageDimensions {
        PageDimensions {
            page_height,
            viewport_height,
            scrollbar_width: 0,
            device_pixel_ratio: 1.0,
        }
    }

    #[test]
    fn scroll_offsets_clamp_last_step_to_bottom() {
        assert_eq!(dims(2000, 800).scroll_offsets(), vec![0, 800, 1200]);
    }

    #[test]
    fn scroll_offsets_exact_multiple() {
        assert_eq!(dims(2400, 800).scroll_offsets(), vec![0, 800, 1600]);
    }

    #[test]
    fn scroll_offsets_short_page_is_single_shot() {
        assert_eq!(dims(500, 800).scroll_offsets(), vec![0]);
    }

    #[test]
    fn scroll_offsets_empty_for_zero_viewport() {
        assert!(dims(2000, 0).scroll_offsets().is_empty());
    }

    #[test]
    fn area_scales_by_ratio() {
        let area = CaptureArea {
            x: 10.0,
            y: 20.0,
            width: 100.5,
            height: 50.0,
            device_pixel_ratio: 2.0,
        };
        assert_eq!(
            area.to_pixels(),
            Some(PixelRect { x: 20, y: 40, width: 201, height: 100 })
        );
    }

    #[test]
    fn zero_ratio_counts_as_one() {
        let area = CaptureArea {
            x: 0.0,
            y: 0.0,
            width: 30.0,
            height: 40.0,
            device_pixel_ratio: 0.0,
        };
        assert_eq!(area.to_pixels().map(|r| (r.width, r.height)), Some((30, 40)));
    }

    #[test]
    fn degenerate_areas_are_rejected() {
        let base = CaptureArea {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            device_pixel_ratio: 1.0,
        };
        assert!(CaptureArea { width: 0.0, ..base }.to_pixels().is_none());
        assert!(CaptureArea { x: -1.0, ..base }.to_pixels().is_none());
        assert!(CaptureArea { height: f64::NAN, ..base }.to_pixels().is_none());
    }

    #[test]
    fn area_json_defaults_ratio() {
        let area: CaptureArea =
            serde_json::from_str(r#"{"x":1,"y":2,"width":3,"height":4}"#).unwrap();
        assert_eq!(area.device_pixel_ratio, 1.0);
    }

    #[test]
    fn page_dimensions_use_camel_case() {
        let json = serde_json::to_value(dims(10, 5)).unwrap();
        assert!(json.get("pageHeight").is_some());
        assert!(json.get("viewportHeight").is_some());
        assert!(json.get("scrollbarWidth").is_some());
        assert!(json.get("devicePixelRatio").is_some());
    }
}

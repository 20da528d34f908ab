//! Page geometry reduction.
//!
//! Browsers disagree about which box reports the real document height, so
//! the page script returns all six candidates and the largest one wins.

use super::ProbeError;
use crate::types::{PageDimensions, ViewportGeometry};
use serde::Deserialize;

/// Raw measurements as reported by `measure_page.js`, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetrics {
    #[serde(default)]
    pub body_scroll_height: f64,
    #[serde(default)]
    pub body_offset_height: f64,
    #[serde(default)]
    pub body_client_height: f64,
    pub root_scroll_height: f64,
    pub root_offset_height: f64,
    pub root_client_height: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub client_width: f64,
    #[serde(default = "unit_ratio")]
    pub device_pixel_ratio: f64,
}

impl PageMetrics {
    /// Collapse the raw measurements into session geometry.
    pub fn into_dimensions(self) -> Result<PageDimensions, ProbeError> {
        let heights = [
            self.body_scroll_height,
            self.root_scroll_height,
            self.body_offset_height,
            self.root_offset_height,
            self.body_client_height,
            self.root_client_height,
        ];
        let mut numbers = heights
            .iter()
            .chain([&self.inner_width, &self.inner_height, &self.client_width]);
        if numbers.any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ProbeError::MalformedGeometry(format!(
                "negative or non-finite measurement in {:?}",
                self
            )));
        }

        let page_height = heights.iter().copied().fold(0.0_f64, f64::max);
        let dims = PageDimensions {
            page_height: page_height.ceil() as u32,
            viewport_height: self.inner_height.round() as u32,
            scrollbar_width: (self.inner_width - self.client_width).max(0.0).round() as u32,
            device_pixel_ratio: self.device_pixel_ratio,
        };
        check_page(&dims)?;
        Ok(dims)
    }
}

/// Reject geometry a full-page pass cannot work with.
pub fn check_page(dims: &PageDimensions) -> Result<(), ProbeError> {
    if dims.viewport_height == 0 {
        return Err(ProbeError::MalformedGeometry(
            "viewport height is zero".to_string(),
        ));
    }
    if dims.page_height == 0 {
        return Err(ProbeError::MalformedGeometry("page height is zero".to_string()));
    }
    Ok(())
}

/// Reject a viewport that would crop to nothing.
pub fn check_viewport(geometry: &ViewportGeometry) -> Result<(), ProbeError> {
    if geometry.width == 0 || geometry.height == 0 {
        return Err(ProbeError::MalformedGeometry(format!(
            "viewport is {}x{}",
            geometry.width, geometry.height
        )));
    }
    Ok(())
}

fn unit_ratio() -> f64 {
    1.0
}

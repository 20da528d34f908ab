//! Image compositing domain — public API.
//!
//! Crops one raw capture to a selected area, or stitches a run of scrolled
//! viewport captures into one page image. Jobs arrive as data URLs and
//! leave as a PNG data URL wrapped in exactly one [`CompositorEvent`].
//!
//! External code should only use what is exported here.

pub mod data_url;
mod region;
mod stitch;
mod worker;

pub use region::crop;
pub use stitch::stitch;
pub use worker::{process, Compositor};

use crate::types::{CaptureArea, PageDimensions};
use serde::{Deserialize, Serialize};

/// Payload of a `cropImage` job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRequest {
    pub data_url: String,
    pub area: CaptureArea,
}

/// Payload of a `stitchImages` job. Captures are ordered top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StitchRequest {
    pub captures: Vec<String>,
    pub page_dimensions: PageDimensions,
}

/// One unit of work for the compositor context.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositorJob {
    Crop(CropRequest),
    Stitch(StitchRequest),
}

impl CompositorJob {
    pub fn kind(&self) -> JobKind {
        match self {
            CompositorJob::Crop(_) => JobKind::Crop,
            CompositorJob::Stitch(_) => JobKind::Stitch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobKind {
    Crop,
    Stitch,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::Crop => f.write_str("crop"),
            JobKind::Stitch => f.write_str("stitch"),
        }
    }
}

/// The single completion event a compositor job produces.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositorEvent {
    Complete { kind: JobKind, data_url: String },
    Failed { kind: JobKind, message: String },
}

impl CompositorEvent {
    pub fn kind(&self) -> JobKind {
        match self {
            CompositorEvent::Complete { kind, .. } | CompositorEvent::Failed { kind, .. } => *kind,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompositeError {
    #[error("Malformed data URL: {0}")]
    MalformedDataUrl(String),

    #[error("Image decode failed: {0}")]
    DecodeFailed(String),

    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Capture area ({x},{y},{width},{height}) is empty or out of range")]
    InvalidArea {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },

    #[error("Composite would have zero width or height")]
    ZeroDimension,

    #[error("No captures to stitch")]
    NoCaptures,

    #[error("Scrollbar ({scrollbar}px) is as wide as the capture ({image_width}px)")]
    ScrollbarExceedsWidth { scrollbar: u32, image_width: u32 },

    #[error("Capture {index} is {width}px wide, expected at least {expected}px")]
    MismatchedWidth {
        index: usize,
        width: u32,
        expected: u32,
    },

    #[error("Compositor context is closed")]
    ContextClosed,
}

//! Wire protocol between the UI shell, page scripts, driver, compositor and
//! presentation surface.
//!
//! Every message is a JSON object tagged by its `action` field, e.g.
//! `{"action":"captureSelectedArea","area":{...}}`. Field names are camelCase
//! to match what the page-side scripts send.

use crate::compositor::{CompositorEvent, CompositorJob, CropRequest, JobKind, StitchRequest};
use crate::types::{CaptureArea, CaptureMode, TabId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Message {
    // ── UI shell → driver ───────────────────────────────────────────
    CaptureVisible,
    CaptureArea,
    CaptureFullPage,

    // ── Selection overlay → driver ──────────────────────────────────
    CaptureSelectedArea { area: CaptureArea },

    // ── Driver → compositor ─────────────────────────────────────────
    CropImage(CropRequest),
    StitchImages(StitchRequest),

    // ── Compositor → driver ─────────────────────────────────────────
    CropComplete { data_url: String },
    StitchComplete { data_url: String },
    CompositeFailed { kind: JobKind, message: String },

    // ── Presentation surface ↔ driver ───────────────────────────────
    GetScreenshotData { tab_id: TabId },
    DisplayScreenshot { data_url: String, title: String },

    // ── Driver → UI shell ───────────────────────────────────────────
    CaptureFailed { mode: CaptureMode, message: String },
}

impl Message {
    /// The compositor job this message carries, if it is one.
    pub fn into_job(self) -> Option<CompositorJob> {
        match self {
            Message::CropImage(request) => Some(CompositorJob::Crop(request)),
            Message::StitchImages(request) => Some(CompositorJob::Stitch(request)),
            _ => None,
        }
    }

    /// Protocol name of this message, as it appears in the `action` field.
    pub fn action(&self) -> &'static str {
        match self {
            Message::CaptureVisible => "captureVisible",
            Message::CaptureArea => "captureArea",
            Message::CaptureFullPage => "captureFullPage",
            Message::CaptureSelectedArea { .. } => "captureSelectedArea",
            Message::CropImage(_) => "cropImage",
            Message::StitchImages(_) => "stitchImages",
            Message::CropComplete { .. } => "cropComplete",
            Message::StitchComplete { .. } => "stitchComplete",
            Message::CompositeFailed { .. } => "compositeFailed",
            Message::GetScreenshotData { .. } => "getScreenshotData",
            Message::DisplayScreenshot { .. } => "displayScreenshot",
            Message::CaptureFailed { .. } => "captureFailed",
        }
    }
}

impl From<CompositorJob> for Message {
    fn from(job: CompositorJob) -> Self {
        match job {
            CompositorJob::Crop(request) => Message::CropImage(request),
            CompositorJob::Stitch(request) => Message::StitchImages(request),
        }
    }
}

impl From<CompositorEvent> for Message {
    fn from(event: CompositorEvent) -> Self {
        match event {
            CompositorEvent::Complete {
                kind: JobKind::Crop,
                data_url,
            } => Message::CropComplete { data_url },
            CompositorEvent::Complete {
                kind: JobKind::Stitch,
                data_url,
            } => Message::StitchComplete { data_url },
            CompositorEvent::Failed { kind, message } => Message::CompositeFailed { kind, message },
        }
    }
}

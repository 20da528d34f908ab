//! Page probe domain — measurement and DOM mutation inside the target page.
//!
//! The driver never touches the page directly. Everything it needs is one
//! of the primitives on [`PageProbe`]: measure, scroll, hide or restore
//! fixed/sticky elements, inject CSS, or load the selection overlay. Each
//! primitive is a single stateless round-trip; suppress and restore are
//! exact inverses.
//!
//!   - geometry.rs  — raw page metrics → typed geometry, sanity checks
//!   - scripted.rs  — `ScriptedProbe`, a probe built on any script runner

mod geometry;
mod scripted;

pub use geometry::{check_page, check_viewport, PageMetrics};
pub use scripted::{ScriptExecutor, ScriptedProbe};

use crate::types::{PageDimensions, TabId, ViewportGeometry};

/// Stylesheet that hides every element the suppress primitive marked with
/// `data-ss-hidden`.
pub const HIDE_SUPPRESSED_CSS: &str = r#"[data-ss-hidden="true"] { visibility: hidden !important; }"#;

/// Primitives executed in the context of the target page.
#[allow(async_fn_in_trait)]
pub trait PageProbe {
    /// Viewport size without the scrollbar, plus device pixel ratio.
    async fn viewport_geometry(&self, tab: TabId) -> Result<ViewportGeometry, ProbeError>;

    /// Full page height, viewport height, scrollbar width and ratio.
    async fn page_dimensions(&self, tab: TabId) -> Result<PageDimensions, ProbeError>;

    /// Scroll the page to an absolute vertical offset in CSS pixels.
    async fn scroll_to(&self, tab: TabId, y: u32) -> Result<(), ProbeError>;

    /// Mark every currently fixed or sticky element as suppressed.
    async fn suppress_fixed_elements(&self, tab: TabId) -> Result<(), ProbeError>;

    /// Clear the suppression mark from every element carrying it.
    async fn restore_suppressed_elements(&self, tab: TabId) -> Result<(), ProbeError>;

    async fn insert_css(&self, tab: TabId, css: &str) -> Result<(), ProbeError>;

    async fn remove_css(&self, tab: TabId, css: &str) -> Result<(), ProbeError>;

    /// Load the selection overlay into the page. Returns immediately; the
    /// overlay reports back on its own with a `captureSelectedArea` request.
    async fn inject_selection_ui(&self, tab: TabId) -> Result<(), ProbeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Page script failed in {tab}: {message}")]
    ScriptFailed { tab: TabId, message: String },

    #[error("Page script returned no result in {0}")]
    NoResult(TabId),

    #[error("Malformed page geometry: {0}")]
    MalformedGeometry(String),
}

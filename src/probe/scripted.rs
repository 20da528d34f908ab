//! Script-backed page probe.
//!
//! Hosts only need to know how to evaluate a JavaScript expression in a tab
//! and hand back its JSON value; the probe owns the scripts and turns their
//! results into typed geometry.

use super::{PageMetrics, PageProbe, ProbeError};
use crate::types::{PageDimensions, TabId, ViewportGeometry};
use serde::de::DeserializeOwned;

const MEASURE_VIEWPORT_JS: &str = include_str!("js/measure_viewport.js");
const MEASURE_PAGE_JS: &str = include_str!("js/measure_page.js");
const SUPPRESS_FIXED_JS: &str = include_str!("js/suppress_fixed.js");
const RESTORE_SUPPRESSED_JS: &str = include_str!("js/restore_suppressed.js");
const SELECTION_OVERLAY_JS: &str = include_str!("js/selection_overlay.js");

/// Runs code inside a tab. Errors are the platform's own messages.
#[allow(async_fn_in_trait)]
pub trait ScriptExecutor {
    /// Evaluate `source` as an expression and return its JSON value.
    async fn execute(&self, tab: TabId, source: &str) -> Result<serde_json::Value, String>;

    async fn insert_css(&self, tab: TabId, css: &str) -> Result<(), String>;

    async fn remove_css(&self, tab: TabId, css: &str) -> Result<(), String>;
}

/// [`PageProbe`] implemented with bundled page scripts.
pub struct ScriptedProbe<E> {
    executor: E,
}

impl<E: ScriptExecutor> ScriptedProbe<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    async fn run(&self, tab: TabId, source: &str) -> Result<serde_json::Value, ProbeError> {
        self.executor
            .execute(tab, source)
            .await
            .map_err(|message| ProbeError::ScriptFailed { tab, message })
    }

    async fn evaluate<T: DeserializeOwned>(&self, tab: TabId, source: &str) -> Result<T, ProbeError> {
        let value = self.run(tab, source).await?;
        if value.is_null() {
            return Err(ProbeError::NoResult(tab));
        }
        serde_json::from_value(value.clone()).map_err(|e| {
            ProbeError::MalformedGeometry(format!("{} (got {})", e, value))
        })
    }
}

impl<E: ScriptExecutor> PageProbe for ScriptedProbe<E> {
    async fn viewport_geometry(&self, tab: TabId) -> Result<ViewportGeometry, ProbeError> {
        let geometry: ViewportGeometry = self.evaluate(tab, MEASURE_VIEWPORT_JS).await?;
        log::debug!(
            "[PROBE] {} viewport {}x{} @{}x",
            tab,
            geometry.width,
            geometry.height,
            geometry.device_pixel_ratio
        );
        Ok(geometry)
    }

    async fn page_dimensions(&self, tab: TabId) -> Result<PageDimensions, ProbeError> {
        let metrics: PageMetrics = self.evaluate(tab, MEASURE_PAGE_JS).await?;
        metrics.into_dimensions()
    }

    async fn scroll_to(&self, tab: TabId, y: u32) -> Result<(), ProbeError> {
        self.run(tab, &format!("window.scrollTo(0, {})", y)).await?;
        Ok(())
    }

    async fn suppress_fixed_elements(&self, tab: TabId) -> Result<(), ProbeError> {
        let marked = self.run(tab, SUPPRESS_FIXED_JS).await?;
        log::debug!("[PROBE] {} suppressed {} fixed/sticky elements", tab, marked);
        Ok(())
    }

    async fn restore_suppressed_elements(&self, tab: TabId) -> Result<(), ProbeError> {
        self.run(tab, RESTORE_SUPPRESSED_JS).await?;
        Ok(())
    }

    async fn insert_css(&self, tab: TabId, css: &str) -> Result<(), ProbeError> {
        self.executor
            .insert_css(tab, css)
            .await
            .map_err(|message| ProbeError::ScriptFailed { tab, message })
    }

    async fn remove_css(&self, tab: TabId, css: &str) -> Result<(), ProbeError> {
        self.executor
            .remove_css(tab, css)
            .await
            .map_err(|message| ProbeError::ScriptFailed { tab, message })
    }

    async fn inject_selection_ui(&self, tab: TabId) -> Result<(), ProbeError> {
        let injected = self.run(tab, SELECTION_OVERLAY_JS).await?;
        if injected == serde_json::Value::Bool(false) {
            log::info!("[PROBE] {} already shows the selection overlay", tab);
        }
        Ok(())
    }
}

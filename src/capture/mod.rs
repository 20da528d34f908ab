//! Capture domain — public API.
//!
//! `CaptureDriver` runs one session per trigger: visible viewport, selected
//! area, or full page. Each session reads the page through a [`PageProbe`],
//! grabs rasters through the [`BrowserHost`], hands them to a fresh
//! compositor context and parks the composite until its presentation
//! surface asks for it.
//!
//! External code should only use what is exported here.

mod full_page;
mod host;
mod session;

pub use host::{BrowserHost, HostError, TabInfo};
pub use session::{SessionGate, SessionGuard};

use crate::compositor::{Compositor, CompositorEvent, CompositorJob, CropRequest, JobKind};
use crate::messages::Message;
use crate::probe::{check_viewport, PageProbe, ProbeError};
use crate::results::PendingResults;
use crate::settings::CaptureSettings;
use crate::types::{CaptureArea, CaptureMode, CompositeResult, TabId};
use std::time::Instant;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Could not get active tab")]
    NoActiveTab,

    #[error("Page probe failed: {0}")]
    Probe(#[from] ProbeError),

    #[error("Viewport capture failed: {0}")]
    Capture(HostError),

    #[error("Compositing ({kind}) failed: {message}")]
    Composite { kind: JobKind, message: String },

    #[error("Could not open presentation surface: {0}")]
    Presentation(HostError),

    #[error("Could not deliver result to {surface}: {source}")]
    Delivery { surface: TabId, source: HostError },
}

/// Orchestrates capture sessions against one browser.
pub struct CaptureDriver<H, P> {
    host: H,
    probe: P,
    settings: CaptureSettings,
    pending: PendingResults,
    sessions: SessionGate,
}

impl<H: BrowserHost, P: PageProbe> CaptureDriver<H, P> {
    pub fn new(host: H, probe: P, settings: CaptureSettings) -> Self {
        let pending = PendingResults::new(settings.pending_ttl);
        Self {
            host,
            probe,
            settings,
            pending,
            sessions: SessionGate::new(),
        }
    }

    pub fn pending(&self) -> &PendingResults {
        &self.pending
    }

    /// Capture the visible viewport of the active tab.
    ///
    /// Returns the id of the presentation surface holding the result.
    pub async fn capture_visible(&self) -> Result<TabId, CaptureError> {
        let outcome = self.visible_session().await;
        self.finish(CaptureMode::Visible, outcome).await
    }

    /// Load the selection overlay into the active tab. The overlay reports
    /// back later through [`capture_selected_area`](Self::capture_selected_area).
    pub async fn capture_area(&self) -> Result<(), CaptureError> {
        let outcome = self.area_session().await;
        if let Err(e) = &outcome {
            self.report_failure(CaptureMode::SelectedArea, e).await;
        }
        outcome
    }

    /// Capture the visible tab and crop it to the area the user selected.
    pub async fn capture_selected_area(&self, area: CaptureArea) -> Result<TabId, CaptureError> {
        let outcome = self.selected_area_session(area).await;
        self.finish(CaptureMode::SelectedArea, outcome).await
    }

    /// Scroll through the whole page, capture every viewport and stitch.
    pub async fn capture_full_page(&self) -> Result<TabId, CaptureError> {
        let outcome = self.full_page_session().await;
        self.finish(CaptureMode::FullPage, outcome).await
    }

    /// Hand a compositor outcome to a new presentation surface.
    ///
    /// Opens the surface and parks the composite under its id. A failed
    /// event opens nothing.
    pub async fn deliver(&self, event: CompositorEvent, title: String) -> Result<TabId, CaptureError> {
        match event {
            CompositorEvent::Complete { kind, data_url } => {
                let surface = self
                    .host
                    .open_presentation_surface()
                    .await
                    .map_err(CaptureError::Presentation)?;
                log::info!("[CAPTURE] {} result opened in {}", kind, surface);
                self.pending
                    .store(surface, CompositeResult { data_url, title })
                    .await;
                Ok(surface)
            }
            CompositorEvent::Failed { kind, message } => {
                Err(CaptureError::Composite { kind, message })
            }
        }
    }

    /// Deliver a completion that arrived as a message rather than from a
    /// context this driver spawned. The title comes from the active tab.
    pub async fn deliver_to_active_tab(&self, event: CompositorEvent) -> Result<TabId, CaptureError> {
        let mode = match event.kind() {
            JobKind::Crop => CaptureMode::Crop,
            JobKind::Stitch => CaptureMode::FullPage,
        };
        let title = match self.host.active_tab().await {
            Some(tab) => self.title_for(&tab.title),
            None => self.settings.default_title.clone(),
        };
        let outcome = self.deliver(event, title).await;
        self.finish(mode, outcome).await
    }

    /// Answer a presentation surface asking for its image.
    ///
    /// Sends `displayScreenshot` the first time; later requests for the same
    /// surface find nothing and return `false`.
    pub async fn present(&self, surface: TabId) -> Result<bool, CaptureError> {
        let Some(result) = self.pending.take_once(surface).await else {
            log::debug!("[CAPTURE] No pending result for {}", surface);
            return Ok(false);
        };
        self.host
            .send_to_tab(
                surface,
                Message::DisplayScreenshot {
                    data_url: result.data_url,
                    title: result.title,
                },
            )
            .await
            .map_err(|source| CaptureError::Delivery { surface, source })?;
        Ok(true)
    }

    // ── sessions ────────────────────────────────────────────────────

    async fn visible_session(&self) -> Result<TabId, CaptureError> {
        let start = Instant::now();
        let tab = self.active_tab().await?;

        let request = {
            let _session = self.sessions.enter(tab.id).await;
            let geometry = self.probe.viewport_geometry(tab.id).await?;
            check_viewport(&geometry)?;
            let data_url = self
                .host
                .capture_visible_tab()
                .await
                .map_err(CaptureError::Capture)?;
            CropRequest {
                data_url,
                area: CaptureArea::viewport(&geometry),
            }
        };
        log::info!(
            "[CAPTURE] Visible capture of {} ({}x{} css) in {}ms",
            tab.id,
            request.area.width,
            request.area.height,
            start.elapsed().as_millis()
        );

        let title = self.title_for(&tab.title);
        self.composite_and_deliver(CompositorJob::Crop(request), title).await
    }

    async fn area_session(&self) -> Result<(), CaptureError> {
        let tab = self.active_tab().await?;
        self.probe.inject_selection_ui(tab.id).await?;
        log::info!("[CAPTURE] Selection overlay injected into {}", tab.id);
        Ok(())
    }

    async fn selected_area_session(&self, area: CaptureArea) -> Result<TabId, CaptureError> {
        // The overlay hides itself right before reporting; give the page a
        // moment to repaint without it.
        tokio::time::sleep(self.settings.selection_settle).await;

        let tab = self.active_tab().await?;
        log::info!(
            "[CAPTURE] Selected area {{x: {}, y: {}, w: {}, h: {}}} in {}",
            area.x,
            area.y,
            area.width,
            area.height,
            tab.id
        );

        let data_url = {
            let _session = self.sessions.enter(tab.id).await;
            self.host
                .capture_visible_tab()
                .await
                .map_err(CaptureError::Capture)?
        };

        let title = self.title_for(&tab.title);
        self.composite_and_deliver(CompositorJob::Crop(CropRequest { data_url, area }), title)
            .await
    }

    async fn full_page_session(&self) -> Result<TabId, CaptureError> {
        let start = Instant::now();
        let tab = self.active_tab().await?;

        let request = {
            let _session = self.sessions.enter(tab.id).await;
            full_page::scroll_and_capture(&self.host, &self.probe, tab.id, &self.settings).await?
        };
        log::info!(
            "[FULLPAGE] {} shots of {} in {}ms",
            request.captures.len(),
            tab.id,
            start.elapsed().as_millis()
        );

        let title = self.title_for(&tab.title);
        self.composite_and_deliver(CompositorJob::Stitch(request), title).await
    }

    // ── helpers ─────────────────────────────────────────────────────

    async fn composite_and_deliver(&self, job: CompositorJob, title: String) -> Result<TabId, CaptureError> {
        let event = Compositor::run_once(job).await;
        self.deliver(event, title).await
    }

    async fn active_tab(&self) -> Result<TabInfo, CaptureError> {
        self.host.active_tab().await.ok_or(CaptureError::NoActiveTab)
    }

    fn title_for(&self, title: &Option<String>) -> String {
        title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.settings.default_title.clone())
    }

    async fn finish(&self, mode: CaptureMode, outcome: Result<TabId, CaptureError>) -> Result<TabId, CaptureError> {
        if let Err(e) = &outcome {
            self.report_failure(mode, e).await;
        }
        outcome
    }

    async fn report_failure(&self, mode: CaptureMode, error: &CaptureError) {
        log::error!("[CAPTURE] Error during {} capture: {}", mode, error);
        let notice = Message::CaptureFailed {
            mode,
            message: error.to_string(),
        };
        if let Err(e) = self.host.notify_shell(notice).await {
            log::warn!("[CAPTURE] Could not report failure to the UI: {}", e);
        }
    }
}

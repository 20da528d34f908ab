//! Message handlers.
//!
//! Bridges incoming protocol messages to the capture driver. Every action
//! the UI shell, the selection overlay, the compositor or a presentation
//! surface can send lands in [`ScreenshotService::handle`], which does one
//! thing per action and optionally hands back a reply.
//!
//! Multi-step capture orchestration lives in the capture domain instead.

use crate::capture::{BrowserHost, CaptureDriver, CaptureError};
use crate::compositor::{Compositor, CompositorEvent, JobKind};
use crate::messages::Message;
use crate::probe::PageProbe;
use crate::settings::CaptureSettings;

/// The background side of the extension: one driver, reached by messages.
pub struct ScreenshotService<H, P> {
    driver: CaptureDriver<H, P>,
}

impl<H: BrowserHost, P: PageProbe> ScreenshotService<H, P> {
    pub fn new(host: H, probe: P, settings: CaptureSettings) -> Self {
        Self {
            driver: CaptureDriver::new(host, probe, settings),
        }
    }

    pub fn driver(&self) -> &CaptureDriver<H, P> {
        &self.driver
    }

    /// Handle one message. Returns the reply to send back to its sender,
    /// if the action has one.
    pub async fn handle(&self, message: Message) -> Result<Option<Message>, CaptureError> {
        log::debug!("[CAPTURE] Received {}", message.action());

        match message {
            Message::CaptureVisible => {
                self.driver.capture_visible().await?;
                Ok(None)
            }
            Message::CaptureArea => {
                self.driver.capture_area().await?;
                Ok(None)
            }
            Message::CaptureFullPage => {
                self.driver.capture_full_page().await?;
                Ok(None)
            }
            Message::CaptureSelectedArea { area } => {
                self.driver.capture_selected_area(area).await?;
                Ok(None)
            }

            // A compositor job sent from elsewhere: run it here and answer
            // with its completion message.
            Message::CropImage(_) | Message::StitchImages(_) => {
                let Some(job) = message.into_job() else {
                    return Ok(None);
                };
                Ok(Some(Compositor::run_once(job).await.into()))
            }

            Message::CropComplete { data_url } => {
                self.deliver(CompositorEvent::Complete {
                    kind: JobKind::Crop,
                    data_url,
                })
                .await
            }
            Message::StitchComplete { data_url } => {
                self.deliver(CompositorEvent::Complete {
                    kind: JobKind::Stitch,
                    data_url,
                })
                .await
            }
            Message::CompositeFailed { kind, message } => {
                self.deliver(CompositorEvent::Failed { kind, message }).await
            }

            Message::GetScreenshotData { tab_id } => {
                self.driver.present(tab_id).await?;
                Ok(None)
            }

            // Outbound only; nothing to do if one is echoed back.
            Message::DisplayScreenshot { .. } | Message::CaptureFailed { .. } => {
                log::debug!("[CAPTURE] Ignoring outbound-only {}", message.action());
                Ok(None)
            }
        }
    }

    async fn deliver(&self, event: CompositorEvent) -> Result<Option<Message>, CaptureError> {
        self.driver.deliver_to_active_tab(event).await?;
        Ok(None)
    }
}

//! Full-page pass — scroll, hide fixed elements, capture, repeat.
//!
//! One pass over the page:
//!   1. Inject the stylesheet that hides suppressed elements
//!   2. Measure the page once; geometry is frozen for the whole pass
//!   3. For each scroll target: scroll → settle → suppress → settle →
//!      capture → restore
//!   4. Remove the stylesheet and scroll back to the top, always
//!
//! Step 3 restores suppressed elements even when the capture fails, and a
//! failure ends the pass without attempting the remaining targets.

use super::host::BrowserHost;
use super::CaptureError;
use crate::compositor::StitchRequest;
use crate::probe::{check_page, PageProbe, HIDE_SUPPRESSED_CSS};
use crate::settings::CaptureSettings;
use crate::types::TabId;

/// Run one full-page pass and return the stitch job for the compositor.
pub(crate) async fn scroll_and_capture<H: BrowserHost, P: PageProbe>(
    host: &H,
    probe: &P,
    tab: TabId,
    settings: &CaptureSettings,
) -> Result<StitchRequest, CaptureError> {
    let outcome = match probe.insert_css(tab, HIDE_SUPPRESSED_CSS).await {
        Ok(()) => capture_pass(host, probe, tab, settings).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = probe.remove_css(tab, HIDE_SUPPRESSED_CSS).await {
        log::warn!("[FULLPAGE] Could not remove hide stylesheet from {}: {}", tab, e);
    }
    if let Err(e) = probe.scroll_to(tab, 0).await {
        log::warn!("[FULLPAGE] Could not scroll {} back to top: {}", tab, e);
    }

    outcome
}

async fn capture_pass<H: BrowserHost, P: PageProbe>(
    host: &H,
    probe: &P,
    tab: TabId,
    settings: &CaptureSettings,
) -> Result<StitchRequest, CaptureError> {
    let dims = probe.page_dimensions(tab).await?;
    check_page(&dims)?;
    log::info!(
        "[FULLPAGE] Page height: {}, viewport height: {}, scrollbar width: {}, dpr: {}",
        dims.page_height,
        dims.viewport_height,
        dims.scrollbar_width,
        dims.device_pixel_ratio
    );

    let offsets = dims.scroll_offsets();
    let mut captures = Vec::with_capacity(offsets.len());

    for (index, &y) in offsets.iter().enumerate() {
        let shot_start = std::time::Instant::now();
        let data_url = capture_at(host, probe, tab, y, settings).await.map_err(|e| {
            log::error!(
                "[FULLPAGE] Shot {}/{} at y={} failed: {}",
                index + 1,
                offsets.len(),
                y,
                e
            );
            e
        })?;
        log::debug!(
            "[FULLPAGE] Shot {}/{} at y={} in {}ms",
            index + 1,
            offsets.len(),
            y,
            shot_start.elapsed().as_millis()
        );
        captures.push(data_url);
    }

    log::info!("[FULLPAGE] Captured parts: {}", captures.len());
    Ok(StitchRequest {
        captures,
        page_dimensions: dims,
    })
}

/// One scroll step. Suppressed elements are restored before returning,
/// whether or not the capture worked.
async fn capture_at<H: BrowserHost, P: PageProbe>(
    host: &H,
    probe: &P,
    tab: TabId,
    y: u32,
    settings: &CaptureSettings,
) -> Result<String, CaptureError> {
    probe.scroll_to(tab, y).await?;
    tokio::time::sleep(settings.scroll_settle).await;

    let shot = match probe.suppress_fixed_elements(tab).await {
        Ok(()) => {
            tokio::time::sleep(settings.hide_settle).await;
            host.capture_visible_tab().await.map_err(CaptureError::Capture)
        }
        Err(e) => Err(e.into()),
    };

    let restored = probe.restore_suppressed_elements(tab).await;
    match (shot, restored) {
        (Ok(data_url), Ok(())) => Ok(data_url),
        (Ok(_), Err(e)) => Err(e.into()),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(restore_err)) => {
            log::warn!("[FULLPAGE] Restore after failed shot also failed: {}", restore_err);
            Err(e)
        }
    }
}

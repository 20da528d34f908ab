//! Visible-viewport and selected-area captures, end to end through the
//! message service, plus the one-shot hand-off to the presentation surface.

mod fake_browser;

use fake_browser::{displayed, page_row, FakeBrowser, PageSpec, HEADER};
use scrollshot_lib::selection::{report, SelectionOverlay};
use scrollshot_lib::types::{CaptureMode, TabId};
use scrollshot_lib::{CaptureError, CaptureSettings, Message, ScreenshotService};

fn service(browser: &FakeBrowser) -> ScreenshotService<FakeBrowser, FakeBrowser> {
    ScreenshotService::new(browser.clone(), browser.clone(), CaptureSettings::without_delays())
}

#[tokio::test]
async fn visible_capture_matches_viewport() {
    let browser = FakeBrowser::new(PageSpec {
        viewport_width: 1280,
        viewport_height: 720,
        page_height: 3000,
        scrollbar_width: 0,
        ..PageSpec::default()
    });
    let service = service(&browser);

    service.handle(Message::CaptureVisible).await.unwrap();
    let surface = browser.state().opened_surfaces[0];
    service
        .handle(Message::GetScreenshotData { tab_id: surface })
        .await
        .unwrap();

    let (image, title) = displayed(&browser, surface);
    assert_eq!(image.dimensions(), (1280, 720));
    assert_eq!(title, "Docs");
    // Visible captures keep fixed elements as the user sees them.
    assert_eq!(*image.get_pixel(0, 0), HEADER);
    assert_eq!(*image.get_pixel(0, 719), page_row(719));
}

#[tokio::test]
async fn visible_capture_drops_scrollbar_at_high_dpi() {
    let browser = FakeBrowser::new(PageSpec {
        device_pixel_ratio: 2.0,
        ..PageSpec::default()
    });
    let service = service(&browser);

    service.handle(Message::CaptureVisible).await.unwrap();
    let surface = browser.state().opened_surfaces[0];
    service.driver().present(surface).await.unwrap();

    let (image, _) = displayed(&browser, surface);
    // 64x40 css viewport at 2x; the 4px css scrollbar is outside the crop.
    assert_eq!(image.dimensions(), (128, 80));
}

#[tokio::test]
async fn capture_area_injects_overlay_only() {
    let browser = FakeBrowser::new(PageSpec::default());
    let service = service(&browser);

    service.handle(Message::CaptureArea).await.unwrap();

    let state = browser.state();
    assert!(state.selection_ui_injected);
    assert_eq!(state.captures, 0);
    assert!(state.opened_surfaces.is_empty());
}

#[tokio::test]
async fn dragged_selection_is_cropped() {
    let browser = FakeBrowser::new(PageSpec::default());
    let service = service(&browser);

    // Drag from bottom-right to top-left.
    let mut overlay = SelectionOverlay::new(1.0);
    overlay.press(50.0, 50.0);
    overlay.drag(30.0, 30.0);
    let area = overlay.release(10.0, 10.0).unwrap();
    assert_eq!((area.x, area.y, area.width, area.height), (10.0, 10.0, 40.0, 40.0));

    // The overlay talks JSON; go through the wire format.
    let wire = serde_json::to_string(&report(area)).unwrap();
    let request: Message = serde_json::from_str(&wire).unwrap();
    service.handle(request).await.unwrap();

    let surface = browser.state().opened_surfaces[0];
    service
        .handle(Message::GetScreenshotData { tab_id: surface })
        .await
        .unwrap();
    let (image, _) = displayed(&browser, surface);
    // 40x40 area of a 40px tall viewport: the last 10 rows fall past the
    // capture and come out transparent.
    assert_eq!(image.dimensions(), (40, 40));
    assert_eq!(*image.get_pixel(0, 0), page_row(10));
    assert_eq!(*image.get_pixel(39, 29), page_row(39));
    assert_eq!(image.get_pixel(0, 35).0[3], 0);
}

#[tokio::test]
async fn result_is_handed_over_only_once() {
    let browser = FakeBrowser::new(PageSpec::default());
    let service = service(&browser);

    let surface = service.driver().capture_visible().await.unwrap();
    assert_eq!(service.driver().pending().len().await, 1);

    assert!(service.driver().present(surface).await.unwrap());
    assert!(!service.driver().present(surface).await.unwrap());
    assert!(service.driver().pending().is_empty().await);

    // Exactly one displayScreenshot went out.
    displayed(&browser, surface);
}

#[tokio::test]
async fn unknown_surface_gets_nothing() {
    let browser = FakeBrowser::new(PageSpec::default());
    let service = service(&browser);

    let reply = service
        .handle(Message::GetScreenshotData { tab_id: TabId(999) })
        .await
        .unwrap();
    assert!(reply.is_none());
    assert!(browser.state().sent.is_empty());
}

#[tokio::test]
async fn untitled_tab_falls_back_to_default_title() {
    let browser = FakeBrowser::new(PageSpec {
        title: Some("   ".to_string()),
        ..PageSpec::default()
    });
    let service = service(&browser);

    let surface = service.driver().capture_visible().await.unwrap();
    service.driver().present(surface).await.unwrap();

    let (_, title) = displayed(&browser, surface);
    assert_eq!(title, "screenshot");
}

#[tokio::test]
async fn missing_tab_is_reported_to_the_shell() {
    let browser = FakeBrowser::new(PageSpec::default()).without_active_tab();
    let service = service(&browser);

    let err = service.handle(Message::CaptureVisible).await.unwrap_err();
    assert!(matches!(err, CaptureError::NoActiveTab));

    let state = browser.state();
    assert_eq!(state.captures, 0);
    assert!(matches!(
        state.shell.as_slice(),
        [Message::CaptureFailed { mode: CaptureMode::Visible, .. }]
    ));
}

#[tokio::test]
async fn compositor_failure_opens_no_surface() {
    let browser = FakeBrowser::new(PageSpec::default());
    let service = service(&browser);

    let err = service
        .handle(Message::CompositeFailed {
            kind: scrollshot_lib::compositor::JobKind::Crop,
            message: "decode failed".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CaptureError::Composite { .. }));

    let state = browser.state();
    assert!(state.opened_surfaces.is_empty());
    // Could have been a visible or a selected-area crop; the report says so.
    assert!(matches!(
        state.shell.as_slice(),
        [Message::CaptureFailed { mode: CaptureMode::Crop, .. }]
    ));
}

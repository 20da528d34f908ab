//! Simulated browser for capture tests.
//!
//! One `FakeBrowser` plays both the host and the page probe. It renders a
//! synthetic page where every physical row has its own color, so stitched
//! output can be checked row by row against the page it came from. A fixed
//! header paints over the top of each viewport unless it is suppressed and
//! the hide stylesheet is in place, and a gray scrollbar column sits on the
//! right edge of every raw capture.

#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use scrollshot_lib::compositor::data_url;
use scrollshot_lib::probe::HIDE_SUPPRESSED_CSS;
use scrollshot_lib::types::{PageDimensions, TabId, ViewportGeometry};
use scrollshot_lib::{BrowserHost, HostError, Message, PageProbe, ProbeError, TabInfo};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::time::Instant;

pub const HEADER: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const SCROLLBAR: Rgba<u8> = Rgba([200, 200, 200, 255]);

/// Color of physical page row `y`. Unique for every row below 65536.
pub fn page_row(y: u32) -> Rgba<u8> {
    Rgba([(y & 0xff) as u8, (y >> 8) as u8, 0x80, 255])
}

/// Page layout in CSS pixels.
#[derive(Debug, Clone)]
pub struct PageSpec {
    pub title: Option<String>,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub page_height: u32,
    pub scrollbar_width: u32,
    pub device_pixel_ratio: f64,
    pub header_height: u32,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            title: Some("Docs".to_string()),
            viewport_width: 64,
            viewport_height: 40,
            page_height: 100,
            scrollbar_width: 4,
            device_pixel_ratio: 1.0,
            header_height: 6,
        }
    }
}

#[derive(Debug, Default)]
pub struct BrowserState {
    pub active: bool,
    pub scroll_y: u32,
    pub suppressed: bool,
    pub css: Vec<String>,
    pub captures: usize,
    pub fail_capture_at: Option<usize>,
    pub selection_ui_injected: bool,
    pub next_surface: i32,
    pub opened_surfaces: Vec<TabId>,
    pub sent: Vec<(TabId, Message)>,
    pub shell: Vec<Message>,
    pub calls: Vec<String>,
    /// When each entry of `calls` happened, on the tokio clock.
    pub stamps: Vec<Instant>,
}

impl BrowserState {
    fn record(&mut self, call: impl Into<String>) {
        self.calls.push(call.into());
        self.stamps.push(Instant::now());
    }

    /// Every recorded call with the time it happened.
    pub fn timeline(&self) -> Vec<(&str, Instant)> {
        self.calls
            .iter()
            .map(String::as_str)
            .zip(self.stamps.iter().copied())
            .collect()
    }
}

#[derive(Clone)]
pub struct FakeBrowser {
    pub tab: TabId,
    pub page: PageSpec,
    state: Arc<Mutex<BrowserState>>,
}

impl FakeBrowser {
    pub fn new(page: PageSpec) -> Self {
        Self {
            tab: TabId(7),
            page,
            state: Arc::new(Mutex::new(BrowserState {
                active: true,
                next_surface: 100,
                ..BrowserState::default()
            })),
        }
    }

    /// Make the `n`th viewport capture (0-based) fail.
    pub fn fail_capture_at(self, n: usize) -> Self {
        self.state().fail_capture_at = Some(n);
        self
    }

    pub fn without_active_tab(self) -> Self {
        self.state().active = false;
        self
    }

    pub fn state(&self) -> MutexGuard<'_, BrowserState> {
        self.state.lock().unwrap()
    }

    /// Every `scroll:N` call, in order.
    pub fn scrolls(&self) -> Vec<u32> {
        self.state()
            .calls
            .iter()
            .filter_map(|c| c.strip_prefix("scroll:"))
            .map(|y| y.parse().unwrap())
            .collect()
    }

    fn dpr(&self) -> f64 {
        self.page.device_pixel_ratio
    }

    fn physical(&self, css: u32) -> u32 {
        (css as f64 * self.dpr()).round() as u32
    }

    fn check_tab(&self, tab: TabId) -> Result<(), ProbeError> {
        if tab == self.tab {
            Ok(())
        } else {
            Err(ProbeError::ScriptFailed {
                tab,
                message: "No tab with id".to_string(),
            })
        }
    }

    fn render_viewport(&self, scroll_y: u32, header_hidden: bool) -> RgbaImage {
        let content_width = self.physical(self.page.viewport_width);
        let width = self.physical(self.page.viewport_width + self.page.scrollbar_width);
        let height = self.physical(self.page.viewport_height);
        let top = self.physical(scroll_y);
        let header = self.physical(self.page.header_height);

        RgbaImage::from_fn(width, height, |x, y| {
            if x >= content_width {
                SCROLLBAR
            } else if y < header && !header_hidden {
                HEADER
            } else {
                page_row(top + y)
            }
        })
    }
}

impl BrowserHost for FakeBrowser {
    async fn active_tab(&self) -> Option<TabInfo> {
        if !self.state().active {
            return None;
        }
        Some(TabInfo {
            id: self.tab,
            title: self.page.title.clone(),
        })
    }

    async fn capture_visible_tab(&self) -> Result<String, HostError> {
        let (scroll_y, header_hidden) = {
            let mut state = self.state();
            let index = state.captures;
            state.captures += 1;
            state.record("capture");
            if state.fail_capture_at == Some(index) {
                return Err(HostError::from("Tabs cannot be edited right now"));
            }
            let hidden = state.suppressed && state.css.iter().any(|c| c == HIDE_SUPPRESSED_CSS);
            (state.scroll_y, hidden)
        };
        let image = self.render_viewport(scroll_y, header_hidden);
        data_url::encode_png(&image).map_err(|e| HostError(e.to_string()))
    }

    async fn open_presentation_surface(&self) -> Result<TabId, HostError> {
        let mut state = self.state();
        let surface = TabId(state.next_surface);
        state.next_surface += 1;
        state.opened_surfaces.push(surface);
        Ok(surface)
    }

    async fn send_to_tab(&self, tab: TabId, message: Message) -> Result<(), HostError> {
        self.state().sent.push((tab, message));
        Ok(())
    }

    async fn notify_shell(&self, message: Message) -> Result<(), HostError> {
        self.state().shell.push(message);
        Ok(())
    }
}

impl PageProbe for FakeBrowser {
    async fn viewport_geometry(&self, tab: TabId) -> Result<ViewportGeometry, ProbeError> {
        self.check_tab(tab)?;
        Ok(ViewportGeometry {
            width: self.page.viewport_width,
            height: self.page.viewport_height,
            device_pixel_ratio: self.dpr(),
        })
    }

    async fn page_dimensions(&self, tab: TabId) -> Result<PageDimensions, ProbeError> {
        self.check_tab(tab)?;
        self.state().record("measure");
        Ok(PageDimensions {
            page_height: self.page.page_height,
            viewport_height: self.page.viewport_height,
            scrollbar_width: self.page.scrollbar_width,
            device_pixel_ratio: self.dpr(),
        })
    }

    async fn scroll_to(&self, tab: TabId, y: u32) -> Result<(), ProbeError> {
        self.check_tab(tab)?;
        let bottom = self.page.page_height.saturating_sub(self.page.viewport_height);
        let mut state = self.state();
        state.scroll_y = y.min(bottom);
        state.record(format!("scroll:{}", y));
        Ok(())
    }

    async fn suppress_fixed_elements(&self, tab: TabId) -> Result<(), ProbeError> {
        self.check_tab(tab)?;
        let mut state = self.state();
        state.suppressed = true;
        state.record("suppress");
        Ok(())
    }

    async fn restore_suppressed_elements(&self, tab: TabId) -> Result<(), ProbeError> {
        self.check_tab(tab)?;
        let mut state = self.state();
        state.suppressed = false;
        state.record("restore");
        Ok(())
    }

    async fn insert_css(&self, tab: TabId, css: &str) -> Result<(), ProbeError> {
        self.check_tab(tab)?;
        let mut state = self.state();
        state.css.push(css.to_string());
        state.record("insert_css");
        Ok(())
    }

    async fn remove_css(&self, tab: TabId, css: &str) -> Result<(), ProbeError> {
        self.check_tab(tab)?;
        let mut state = self.state();
        state.css.retain(|c| c != css);
        state.record("remove_css");
        Ok(())
    }

    async fn inject_selection_ui(&self, tab: TabId) -> Result<(), ProbeError> {
        self.check_tab(tab)?;
        let mut state = self.state();
        state.selection_ui_injected = true;
        state.record("inject_selection_ui");
        Ok(())
    }
}

/// The image carried by the single `displayScreenshot` sent to `surface`.
pub fn displayed(browser: &FakeBrowser, surface: TabId) -> (RgbaImage, String) {
    let state = browser.state();
    let shown: Vec<_> = state
        .sent
        .iter()
        .filter(|(tab, _)| *tab == surface)
        .collect();
    assert_eq!(shown.len(), 1, "expected exactly one message to {}", surface);
    match &shown[0].1 {
        Message::DisplayScreenshot { data_url: url, title } => {
            (data_url::decode(url).unwrap(), title.clone())
        }
        other => panic!("unexpected message: {:?}", other),
    }
}

//! Browser host — the platform calls the driver makes outside the page.
//!
//! This is the infrastructure seam: one implementation talks to the real
//! extension APIs, tests plug in a simulated browser.

use crate::messages::Message;
use crate::types::TabId;

/// The tab a session targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub id: TabId,
    pub title: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait BrowserHost {
    /// The active tab of the current window, if any.
    async fn active_tab(&self) -> Option<TabInfo>;

    /// Raster capture of the visible viewport as a PNG data URL.
    async fn capture_visible_tab(&self) -> Result<String, HostError>;

    /// Open a new presentation surface and return its id.
    async fn open_presentation_surface(&self) -> Result<TabId, HostError>;

    /// Deliver a message to one tab.
    async fn send_to_tab(&self, tab: TabId, message: Message) -> Result<(), HostError>;

    /// Deliver a message to the extension's own UI (popup, shell).
    async fn notify_shell(&self, message: Message) -> Result<(), HostError>;
}

/// A failed platform call, carrying the platform's message.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct HostError(pub String);

impl From<String> for HostError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for HostError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

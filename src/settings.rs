//! Capture settings — settle delays, pending-result lifetime, title fallback.
//!
//! Defaults mirror the timings the extension has always used. Every value
//! can be overridden through environment variables (loaded from
//! `.env.local` / `.env` by [`crate::init`]):
//!
//!   - SCROLLSHOT_SCROLL_SETTLE_MS     wait after each scroll (default 300)
//!   - SCROLLSHOT_HIDE_SETTLE_MS       wait after hiding fixed elements (default 100)
//!   - SCROLLSHOT_SELECTION_SETTLE_MS  wait for the selection overlay to vanish (default 100)
//!   - SCROLLSHOT_PENDING_TTL_SECS     unclaimed result lifetime (default 60)
//!   - SCROLLSHOT_DEFAULT_TITLE        title when the tab has none (default "screenshot")

use std::time::Duration;

const DEFAULT_SCROLL_SETTLE_MS: u64 = 300;
const DEFAULT_HIDE_SETTLE_MS: u64 = 100;
const DEFAULT_SELECTION_SETTLE_MS: u64 = 100;
const DEFAULT_PENDING_TTL_SECS: u64 = 60;
const DEFAULT_TITLE: &str = "screenshot";

/// Tunables for one capture driver.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSettings {
    /// Re-render wait after every scroll step of a full-page capture.
    pub scroll_settle: Duration,
    /// Wait between marking fixed/sticky elements and taking the shot.
    pub hide_settle: Duration,
    /// Wait before capturing a selected area so the overlay is gone.
    pub selection_settle: Duration,
    /// How long a finished composite waits for its presentation surface.
    pub pending_ttl: Duration,
    /// Display title used when the source tab reports none.
    pub default_title: String,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            scroll_settle: Duration::from_millis(DEFAULT_SCROLL_SETTLE_MS),
            hide_settle: Duration::from_millis(DEFAULT_HIDE_SETTLE_MS),
            selection_settle: Duration::from_millis(DEFAULT_SELECTION_SETTLE_MS),
            pending_ttl: Duration::from_secs(DEFAULT_PENDING_TTL_SECS),
            default_title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl CaptureSettings {
    /// Build settings from the process environment, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable lookup,
    /// so tests don't have to mutate the real environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let millis = |key: &str, fallback: Duration| {
            read_u64(&lookup, key)
                .map(Duration::from_millis)
                .unwrap_or(fallback)
        };

        let default_title = lookup("SCROLLSHOT_DEFAULT_TITLE")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or(defaults.default_title);

        Self {
            scroll_settle: millis("SCROLLSHOT_SCROLL_SETTLE_MS", defaults.scroll_settle),
            hide_settle: millis("SCROLLSHOT_HIDE_SETTLE_MS", defaults.hide_settle),
            selection_settle: millis("SCROLLSHOT_SELECTION_SETTLE_MS", defaults.selection_settle),
            pending_ttl: read_u64(&lookup, "SCROLLSHOT_PENDING_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.pending_ttl),
            default_title,
        }
    }

    /// Settings with every delay set to zero. Handy for hosts that already
    /// wait for layout stability themselves, and for tests.
    pub fn without_delays() -> Self {
        Self {
            scroll_settle: Duration::ZERO,
            hide_settle: Duration::ZERO,
            selection_settle: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn read_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("[SETTINGS] Ignoring {}={:?}: not a non-negative integer", key, raw);
            None
        }
    }
}

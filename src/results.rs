//! Pending results — mailbox between a finished capture and its viewer.
//!
//! A presentation surface is a freshly opened page; it cannot receive the
//! composite as a return value, so the driver parks the result here under
//! the surface's id and the surface claims it once it has loaded. Claiming
//! removes the entry, so a surface that asks twice (page load racing the
//! message) still renders the image exactly once.
//!
//! Unclaimed entries expire after the configured TTL and are swept on
//! every store.

use crate::types::{CompositeResult, TabId};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct PendingEntry {
    result: CompositeResult,
    stored_at: Instant,
}

/// Process-wide store of composites awaiting their presentation surface.
pub struct PendingResults {
    ttl: Duration,
    entries: Mutex<HashMap<TabId, PendingEntry>>,
}

impl PendingResults {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Park `result` for `surface`, replacing anything already there.
    pub async fn store(&self, surface: TabId, result: CompositeResult) {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        let evicted = evict(&mut entries, self.ttl, now);
        if evicted > 0 {
            log::warn!("[RESULTS] Dropped {} unclaimed result(s) past {:?}", evicted, self.ttl);
        }
        if entries
            .insert(surface, PendingEntry { result, stored_at: now })
            .is_some()
        {
            log::warn!("[RESULTS] Replaced an unclaimed result for {}", surface);
        }
        log::info!("[RESULTS] Stored result for {} ({} pending)", surface, entries.len());
    }

    /// Claim the result for `surface`. Only the first call gets it.
    pub async fn take_once(&self, surface: TabId) -> Option<CompositeResult> {
        let entry = self.entries.lock().await.remove(&surface)?;
        if entry.stored_at.elapsed() > self.ttl {
            log::warn!("[RESULTS] Result for {} expired before it was claimed", surface);
            return None;
        }
        log::info!("[RESULTS] Delivered result to {}", surface);
        Some(entry.result)
    }

    /// Drop every entry older than the TTL as of `now`. Returns how many went.
    pub async fn evict_expired(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().await;
        evict(&mut entries, self.ttl, now)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

fn evict(entries: &mut HashMap<TabId, PendingEntry>, ttl: Duration, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| now.saturating_duration_since(entry.stored_at) <= ttl);
    before - entries.len()
}

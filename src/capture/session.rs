//! Per-tab session gate.
//!
//! Two full-page captures on one tab would fight over the same scroll
//! position and hidden elements, so sessions targeting the same tab are
//! queued behind each other. Different tabs never wait on each other.

use crate::types::TabId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct SessionGate {
    tabs: Mutex<HashMap<TabId, Arc<Mutex<()>>>>,
}

/// Held for the page-touching part of a session.
pub struct SessionGuard {
    tab: TabId,
    _guard: OwnedMutexGuard<()>,
}

impl SessionGuard {
    pub fn tab(&self) -> TabId {
        self.tab
    }
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other session holds `tab`, then claim it.
    pub async fn enter(&self, tab: TabId) -> SessionGuard {
        let lock = {
            let mut tabs = self.tabs.lock().await;
            // Forget tabs nobody is holding or waiting on.
            tabs.retain(|_, lock| Arc::strong_count(lock) > 1);
            tabs.entry(tab).or_default().clone()
        };

        let guard = match lock.clone().try_lock_owned() {
            Ok(guard) => guard,
            Err(_) => {
                log::info!("[CAPTURE] {} is busy, queueing session", tab);
                lock.lock_owned().await
            }
        };
        SessionGuard { tab, _guard: guard }
    }
}

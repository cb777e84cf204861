//! Per-tab activity ledger.
//!
//! Maps a tab id to the last instant the tab was observed active. Process
//! local only: the ledger is rebuilt at startup by stamping every open tab
//! with the current time, so a restart treats all tabs as freshly active.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tw_core::TabId;

#[derive(Debug, Default)]
pub struct ActivityLedger {
    last_active: HashMap<TabId, DateTime<Utc>>,
}

impl ActivityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp a tab as active at `at`. Later stamps simply overwrite.
    pub fn record_activity(&mut self, tab_id: TabId, at: DateTime<Utc>) {
        self.last_active.insert(tab_id, at);
    }

    /// Last-active instant for a tab.
    ///
    /// An unknown id returns `now`: a tab created between sweeps has no
    /// record yet, and treating it as freshly active prevents the next
    /// sweep from closing it on sight.
    pub fn last_active(&self, tab_id: TabId, now: DateTime<Utc>) -> DateTime<Utc> {
        self.last_active.get(&tab_id).copied().unwrap_or(now)
    }

    /// Drop a tab's record. Called once, on tab removal.
    pub fn forget(&mut self, tab_id: TabId) {
        self.last_active.remove(&tab_id);
    }

    /// Stamp every listed tab with `now`. Startup path: all currently open
    /// tabs become newly active.
    pub fn seed<I: IntoIterator<Item = TabId>>(&mut self, tab_ids: I, now: DateTime<Utc>) {
        for id in tab_ids {
            self.last_active.insert(id, now);
        }
    }

    pub fn len(&self) -> usize {
        self.last_active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_active.is_empty()
    }
}

//! In-memory collaborator fakes shared by the controller and scheduler
//! tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tw_config::{Settings, SettingsStore};
use tw_core::{EngineError, HistoryEntry, TabId, TabSnapshot};

use crate::host::{HistoryStore, Notifier, TabHost};

/// Fixed reference instant for deterministic tests.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn tab(id: i64, url: &str, accessed: DateTime<Utc>) -> TabSnapshot {
    TabSnapshot {
        id: TabId(id),
        url: url.into(),
        pinned: false,
        active: false,
        discarded: false,
        last_accessed: accessed,
    }
}

#[derive(Default)]
pub struct FakeHost {
    pub tabs: Mutex<Vec<TabSnapshot>>,
    pub closed: Mutex<Vec<TabId>>,
    pub discarded: Mutex<Vec<TabId>>,
    pub removed: Mutex<Vec<TabId>>,
    /// Ids whose mutating calls fail with "tab gone".
    pub fail_ids: Mutex<Vec<TabId>>,
}

impl FakeHost {
    pub fn set_tabs(&self, tabs: Vec<TabSnapshot>) {
        *self.tabs.lock().unwrap() = tabs;
    }

    pub fn closed(&self) -> Vec<TabId> {
        self.closed.lock().unwrap().clone()
    }

    pub fn discarded(&self) -> Vec<TabId> {
        self.discarded.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<TabId> {
        self.removed.lock().unwrap().clone()
    }

    pub fn fail_on(&self, id: TabId) {
        self.fail_ids.lock().unwrap().push(id);
    }

    fn check(&self, id: TabId) -> Result<()> {
        if self.fail_ids.lock().unwrap().contains(&id) {
            return Err(EngineError::TabGone(id).into());
        }
        Ok(())
    }
}

#[async_trait]
impl TabHost for FakeHost {
    async fn query_tabs(&self) -> Result<Vec<TabSnapshot>> {
        Ok(self.tabs.lock().unwrap().clone())
    }

    async fn close_tab(&self, tab_id: TabId) -> Result<()> {
        self.check(tab_id)?;
        self.closed.lock().unwrap().push(tab_id);
        Ok(())
    }

    async fn discard_tab(&self, tab_id: TabId) -> Result<()> {
        self.check(tab_id)?;
        self.discarded.lock().unwrap().push(tab_id);
        Ok(())
    }

    async fn remove_tab(&self, tab_id: TabId) -> Result<()> {
        self.check(tab_id)?;
        self.removed.lock().unwrap().push(tab_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySettingsStore {
    pub settings: Mutex<Settings>,
    pub fail: AtomicBool,
}

impl MemorySettingsStore {
    pub fn with(settings: Settings) -> Self {
        Self {
            settings: Mutex::new(settings),
            fail: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<Settings> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("settings store offline");
        }
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        *self.settings.lock().unwrap() = settings.clone();
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryHistoryStore {
    pub entries: Mutex<Vec<HistoryEntry>>,
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.entries.lock().unwrap().clone())
    }

    async fn store(&self, entries: &[HistoryEntry]) -> Result<()> {
        *self.entries.lock().unwrap() = entries.to_vec();
        Ok(())
    }
}

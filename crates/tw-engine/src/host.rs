//! Collaborator seams: the browser host, user notifications, and the
//! persisted history store.
//!
//! The engine never talks to a real browser directly; everything it needs
//! from the outside world goes through these traits so tests can run
//! against in-memory fakes.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tw_core::{HistoryEntry, TabId, TabSnapshot};

/// Browser-side tab operations.
///
/// All calls are failure-isolated by the caller: a tab may vanish between
/// the snapshot and the mutating call, and implementations are expected to
/// surface that as an error rather than panic.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// Enumerate all open tabs as of now.
    async fn query_tabs(&self) -> Result<Vec<TabSnapshot>>;

    /// Close a tab (regular close, session-restorable by the browser).
    async fn close_tab(&self, tab_id: TabId) -> Result<()>;

    /// Discard a tab: suspend its in-memory state, keep its entry visible.
    async fn discard_tab(&self, tab_id: TabId) -> Result<()>;

    /// Remove a tab entirely (hard close, used by the reaper).
    async fn remove_tab(&self, tab_id: TabId) -> Result<()>;
}

/// User-visible notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, message: &str) -> Result<()>;
}

/// Persisted history of closed/unloaded tabs, read-only to the display
/// collaborator.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load persisted entries, oldest first. Missing store loads empty.
    async fn load(&self) -> Result<Vec<HistoryEntry>>;

    /// Replace the persisted entries wholesale.
    async fn store(&self, entries: &[HistoryEntry]) -> Result<()>;
}

/// Persisted blob layout; the key name is part of the external contract.
#[derive(Debug, Default, Serialize, Deserialize)]
struct HistoryBlob {
    #[serde(rename = "closedTabs", default)]
    closed_tabs: Vec<HistoryEntry>,
}

/// JSON-file history store.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn load(&self) -> Result<Vec<HistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history: {}", self.path.display()))?;
        let blob: HistoryBlob = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse history: {}", self.path.display()))?;
        Ok(blob.closed_tabs)
    }

    async fn store(&self, entries: &[HistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create history dir: {}", parent.display()))?;
        }
        let blob = HistoryBlob {
            closed_tabs: entries.to_vec(),
        };
        let content = serde_json::to_string(&blob).context("Failed to serialize history")?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write history: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace history file: {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tw_core::HistoryEventKind;

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHistoryStore::new(dir.path().join("history.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileHistoryStore::new(dir.path().join("history.json"));

        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let entries = vec![
            HistoryEntry::new("https://a.example/", t0, HistoryEventKind::Closed),
            HistoryEntry::new("https://b.example/", t0, HistoryEventKind::Killed),
        ];
        store.store(&entries).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, entries);
    }

    #[tokio::test]
    async fn test_blob_uses_closed_tabs_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        let store = FileHistoryStore::new(&path);

        let t0 = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        store
            .store(&[HistoryEntry::new(
                "https://a.example/",
                t0,
                HistoryEventKind::Unloaded,
            )])
            .await
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"closedTabs\""));
        assert!(raw.contains("\"unloaded\""));
    }
}

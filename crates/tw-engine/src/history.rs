//! Bounded in-memory log of terminal tab events.

use std::collections::VecDeque;

use tw_core::HistoryEntry;

/// Maximum retained entries.
pub const HISTORY_CAPACITY: usize = 100;

/// Append-only event log with strict FIFO eviction.
///
/// Entries are never re-ordered or touched on read; once capacity is hit
/// the single oldest entry is dropped per append.
#[derive(Debug, Default)]
pub struct BoundedHistory {
    entries: VecDeque<HistoryEntry>,
}

impl BoundedHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from persisted entries (oldest first), keeping only the
    /// newest `HISTORY_CAPACITY`.
    pub fn from_entries(entries: Vec<HistoryEntry>) -> Self {
        let mut history = Self::new();
        for entry in entries {
            history.append(entry);
        }
        history
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Snapshot of the most recent `n` entries, most-recent-first.
    pub fn recent(&self, n: usize) -> Vec<HistoryEntry> {
        self.entries.iter().rev().take(n).cloned().collect()
    }

    /// All entries in insertion order (oldest first), for persistence.
    pub fn all(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

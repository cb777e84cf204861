//! Tracker for tabs the engine has discarded.
//!
//! Feeds the stale-unload reaper. Must stay consistent with reality between
//! reaper runs: a record is cleared the moment its tab becomes active
//! again, not only when the reaper gets around to it.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tw_core::TabId;

#[derive(Debug, Default)]
pub struct UnloadTracker {
    unloaded_at: HashMap<TabId, DateTime<Utc>>,
}

impl UnloadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_unloaded(&mut self, tab_id: TabId, at: DateTime<Utc>) {
        self.unloaded_at.insert(tab_id, at);
    }

    /// Drop a record because the tab woke up (or was removed).
    pub fn clear(&mut self, tab_id: TabId) {
        self.unloaded_at.remove(&tab_id);
    }

    pub fn contains(&self, tab_id: TabId) -> bool {
        self.unloaded_at.contains_key(&tab_id)
    }

    /// Ids discarded for longer than `threshold` as of `now`.
    pub fn stale(&self, threshold: Duration, now: DateTime<Utc>) -> Vec<TabId> {
        self.unloaded_at
            .iter()
            .filter(|(_, at)| now - **at > threshold)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.unloaded_at.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_mark_and_contains() {
        let mut tracker = UnloadTracker::new();
        tracker.mark_unloaded(TabId(1), t0());
        assert!(tracker.contains(TabId(1)));
        assert!(!tracker.contains(TabId(2)));
    }

    #[test]
    fn test_stale_respects_threshold() {
        let mut tracker = UnloadTracker::new();
        tracker.mark_unloaded(TabId(1), t0());
        tracker.mark_unloaded(TabId(2), t0() + Duration::hours(23));

        let now = t0() + Duration::hours(25);
        let stale = tracker.stale(Duration::hours(24), now);
        assert_eq!(stale, vec![TabId(1)]);
    }

    #[test]
    fn test_exactly_at_threshold_not_stale() {
        let mut tracker = UnloadTracker::new();
        tracker.mark_unloaded(TabId(1), t0());
        let stale = tracker.stale(Duration::hours(24), t0() + Duration::hours(24));
        assert!(stale.is_empty());
    }

    #[test]
    fn test_clear_removes_record() {
        let mut tracker = UnloadTracker::new();
        tracker.mark_unloaded(TabId(1), t0());
        tracker.clear(TabId(1));
        assert!(tracker.is_empty());
        assert!(
            tracker
                .stale(Duration::zero(), t0() + Duration::days(7))
                .is_empty()
        );
    }
}

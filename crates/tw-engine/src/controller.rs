//! Lifecycle controller: owns the engine state and runs the sweeps.
//!
//! All decisions for one tick are computed from a settings blob and tab
//! snapshot fetched at tick start; a collaborator failure at that stage
//! aborts the tick with no partial state. Per-tab failures mid-sweep are
//! logged and skipped, never fatal.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use tw_config::{DefaultBehavior, Settings, SettingsStore};
use tw_core::{EngineError, HistoryEntry, HistoryEventKind, PatternAction, TabSnapshot};

use crate::clock::Clock;
use crate::duplicates::{EquivalenceClass, is_oldest_duplicate};
use crate::events::TabEvent;
use crate::history::BoundedHistory;
use crate::host::{HistoryStore, Notifier, TabHost};
use crate::ledger::ActivityLedger;
use crate::rules::resolve_action;
use crate::unload::UnloadTracker;

/// How long a tab may stay discarded before the reaper removes it.
const STALE_UNLOAD_THRESHOLD_HOURS: i64 = 24;

/// Outcome summary for one sweep pass.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SweepReport {
    pub examined: usize,
    pub closed: usize,
    pub discarded: usize,
    pub killed: usize,
    pub failures: usize,
}

pub struct LifecycleController {
    ledger: ActivityLedger,
    tracker: UnloadTracker,
    history: BoundedHistory,
    clock: Arc<dyn Clock>,
    host: Arc<dyn TabHost>,
    notifier: Arc<dyn Notifier>,
    settings_store: Arc<dyn SettingsStore>,
    history_store: Arc<dyn HistoryStore>,
    /// When the scheduled unload sweep last completed a pass.
    last_unload_pass: DateTime<Utc>,
}

impl LifecycleController {
    /// Build a controller and rebuild its process-local state.
    ///
    /// Every currently open tab is stamped with the current time (a restart
    /// treats all tabs as newly active) and the persisted history is loaded
    /// back into the bounded log. Both steps are best-effort: an unavailable
    /// collaborator leaves the state empty rather than failing startup.
    pub async fn new(
        clock: Arc<dyn Clock>,
        host: Arc<dyn TabHost>,
        notifier: Arc<dyn Notifier>,
        settings_store: Arc<dyn SettingsStore>,
        history_store: Arc<dyn HistoryStore>,
    ) -> Self {
        let now = clock.now();

        let mut ledger = ActivityLedger::new();
        match host.query_tabs().await {
            Ok(tabs) => {
                ledger.seed(tabs.iter().map(|t| t.id), now);
                debug!(tabs = ledger.len(), "Seeded activity ledger at startup");
            }
            Err(err) => warn!(error = %err, "Could not enumerate tabs at startup"),
        }

        let history = match history_store.load().await {
            Ok(entries) => BoundedHistory::from_entries(entries),
            Err(err) => {
                warn!(error = %err, "Could not load persisted history");
                BoundedHistory::new()
            }
        };

        Self {
            ledger,
            tracker: UnloadTracker::new(),
            history,
            clock,
            host,
            notifier,
            settings_store,
            history_store,
            last_unload_pass: now,
        }
    }

    /// Route one inbound browser event into the engine state.
    pub fn handle_event(&mut self, event: TabEvent) {
        let now = self.clock.now();
        match event {
            TabEvent::Created { id } => self.ledger.record_activity(id, now),
            TabEvent::Activated { id } => {
                self.ledger.record_activity(id, now);
                // Reactivation wakes a discarded tab; the reaper must not
                // see it afterwards.
                self.tracker.clear(id);
            }
            TabEvent::Updated {
                id,
                url_changed,
                navigation_complete,
                active,
            } => {
                if url_changed || navigation_complete {
                    self.ledger.record_activity(id, now);
                }
                if active {
                    self.tracker.clear(id);
                }
            }
            TabEvent::Removed { id } => {
                self.ledger.forget(id);
                self.tracker.clear(id);
            }
            TabEvent::WindowFocused { active_tab } => {
                if let Some(id) = active_tab {
                    self.ledger.record_activity(id, now);
                    self.tracker.clear(id);
                }
            }
        }
    }

    /// Most recent history entries, newest first.
    pub fn recent_history(&self, n: usize) -> Vec<HistoryEntry> {
        self.history.recent(n)
    }

    /// Close tabs idle past the configured time limit, honoring patterns
    /// and duplicate rules.
    pub async fn inactivity_sweep(&mut self) -> Result<SweepReport> {
        let settings = self.load_settings().await?;
        let mut report = SweepReport::default();
        if !settings.enabled {
            return Ok(report);
        }

        let tabs = self
            .fetch_tabs()
            .await
            .context("Skipping inactivity sweep")?;
        let now = self.clock.now();

        // The active tab counts as in-use for the whole sweep interval.
        for tab in tabs.iter().filter(|t| t.active) {
            self.ledger.record_activity(tab.id, now);
        }

        let patterns = settings.merged_patterns();
        let time_limit = Duration::minutes(i64::from(settings.time_limit_minutes));

        for tab in &tabs {
            if tab.pinned {
                continue;
            }
            report.examined += 1;

            let elapsed = now - self.ledger.last_active(tab.id, now);
            if elapsed < time_limit {
                continue;
            }

            if !self.should_close(tab, &tabs, &patterns, settings.default_behavior) {
                continue;
            }

            info!(tab_id = %tab.id, url = %tab.url, "Closing inactive tab");
            self.notify(&settings, "Tab closed", &tab.url).await;
            self.history
                .append(HistoryEntry::new(&tab.url, now, HistoryEventKind::Closed));
            match self.host.close_tab(tab.id).await {
                Ok(()) => report.closed += 1,
                Err(err) => {
                    // The tab may have vanished mid-sweep; move on.
                    warn!(tab_id = %tab.id, error = %err, "Failed to close tab");
                    report.failures += 1;
                }
            }
            self.ledger.forget(tab.id);
            self.tracker.clear(tab.id);
        }

        self.persist_history().await;
        Ok(report)
    }

    /// Discard every inactive tab once the configured interval has elapsed
    /// since the previous pass.
    pub async fn scheduled_unload_sweep(&mut self) -> Result<SweepReport> {
        let settings = self.load_settings().await?;
        let mut report = SweepReport::default();
        if !settings.enabled {
            return Ok(report);
        }

        let now = self.clock.now();
        let interval = Duration::minutes(i64::from(settings.unload_timeout_minutes));
        if now - self.last_unload_pass < interval {
            return Ok(report);
        }

        let tabs = self.fetch_tabs().await.context("Skipping unload sweep")?;

        for tab in &tabs {
            if tab.pinned || tab.active || tab.discarded {
                continue;
            }
            report.examined += 1;
            self.discard_one(tab, &settings, now, &mut report).await;
        }

        // Reset even when zero tabs qualified, so the next check waits a
        // full interval again.
        self.last_unload_pass = now;

        self.persist_history().await;
        Ok(report)
    }

    /// One-shot unload triggered on demand: discards tabs idle past the
    /// inactivity time limit, independent of the scheduled pass timer.
    pub async fn manual_unload_sweep(&mut self) -> Result<SweepReport> {
        let settings = self.load_settings().await?;
        let mut report = SweepReport::default();

        let tabs = self.fetch_tabs().await.context("Skipping manual unload")?;
        let now = self.clock.now();
        let time_limit = Duration::minutes(i64::from(settings.time_limit_minutes));

        for tab in &tabs {
            if tab.pinned || tab.active || tab.discarded {
                continue;
            }
            let elapsed = now - self.ledger.last_active(tab.id, now);
            if elapsed <= time_limit {
                continue;
            }
            report.examined += 1;
            self.discard_one(tab, &settings, now, &mut report).await;
        }

        self.persist_history().await;
        Ok(report)
    }

    /// Remove tabs that have sat discarded for over 24 hours.
    pub async fn stale_unload_reaper(&mut self) -> Result<SweepReport> {
        let settings = self.load_settings().await?;
        let mut report = SweepReport::default();
        if !settings.auto_kill_unloaded {
            return Ok(report);
        }

        let tabs = self.fetch_tabs().await.context("Skipping reaper")?;
        let now = self.clock.now();
        let threshold = Duration::hours(STALE_UNLOAD_THRESHOLD_HOURS);

        for tab_id in self.tracker.stale(threshold, now) {
            report.examined += 1;
            // The record is dropped no matter what happens below; retrying
            // a failed removal forever helps nobody.
            self.tracker.clear(tab_id);

            let Some(tab) = tabs.iter().find(|t| t.id == tab_id) else {
                debug!(tab_id = %tab_id, "Stale unload record for a vanished tab");
                continue;
            };
            if tab.active || !tab.discarded {
                continue;
            }

            info!(tab_id = %tab_id, url = %tab.url, "Removing long-discarded tab");
            match self.host.remove_tab(tab_id).await {
                Ok(()) => {
                    self.history
                        .append(HistoryEntry::new(&tab.url, now, HistoryEventKind::Killed));
                    self.notify(&settings, "Tab removed", &tab.url).await;
                    self.ledger.forget(tab_id);
                    report.killed += 1;
                }
                Err(err) => {
                    warn!(tab_id = %tab_id, error = %err, "Failed to remove stale tab");
                    report.failures += 1;
                }
            }
        }

        self.persist_history().await;
        Ok(report)
    }

    fn should_close(
        &self,
        tab: &TabSnapshot,
        all_tabs: &[TabSnapshot],
        patterns: &[tw_core::Pattern],
        default_behavior: DefaultBehavior,
    ) -> bool {
        match resolve_action(&tab.url, patterns) {
            Some(PatternAction::Keep) => false,
            Some(PatternAction::Close) => true,
            Some(PatternAction::Duplicate) => {
                is_oldest_duplicate(tab, all_tabs, EquivalenceClass::Exact)
            }
            Some(PatternAction::DuplicateNoQuery) => {
                is_oldest_duplicate(tab, all_tabs, EquivalenceClass::NoQuery)
            }
            Some(PatternAction::DuplicateDomain) => {
                is_oldest_duplicate(tab, all_tabs, EquivalenceClass::Domain)
            }
            None => match default_behavior {
                DefaultBehavior::Duplicate => {
                    is_oldest_duplicate(tab, all_tabs, EquivalenceClass::Exact)
                }
                DefaultBehavior::DuplicateNoQuery => {
                    is_oldest_duplicate(tab, all_tabs, EquivalenceClass::NoQuery)
                }
                DefaultBehavior::DuplicateDomain => {
                    is_oldest_duplicate(tab, all_tabs, EquivalenceClass::Domain)
                }
                DefaultBehavior::Always => true,
                DefaultBehavior::Never => false,
            },
        }
    }

    async fn discard_one(
        &mut self,
        tab: &TabSnapshot,
        settings: &Settings,
        now: DateTime<Utc>,
        report: &mut SweepReport,
    ) {
        match self.host.discard_tab(tab.id).await {
            Ok(()) => {
                self.tracker.mark_unloaded(tab.id, now);
                self.history
                    .append(HistoryEntry::new(&tab.url, now, HistoryEventKind::Unloaded));
                self.notify(settings, "Tab unloaded", &tab.url).await;
                report.discarded += 1;
            }
            Err(err) => {
                warn!(tab_id = %tab.id, error = %err, "Failed to discard tab");
                report.failures += 1;
            }
        }
    }

    /// Settings blob for one tick. An unreadable store aborts the tick; all
    /// decisions for a tick come from data fetched at tick start.
    async fn load_settings(&self) -> Result<Settings> {
        self.settings_store
            .load()
            .await
            .map_err(|err| EngineError::StoreUnavailable(err.to_string()).into())
    }

    async fn fetch_tabs(&self) -> Result<Vec<TabSnapshot>> {
        self.host
            .query_tabs()
            .await
            .map_err(|err| EngineError::HostUnavailable(err.to_string()).into())
    }

    async fn notify(&self, settings: &Settings, title: &str, message: &str) {
        if !settings.show_notifications {
            return;
        }
        if let Err(err) = self.notifier.notify(title, message).await {
            warn!(error = %err, "Notification failed");
        }
    }

    /// Mirror the in-memory log to the persisted store. The in-memory log
    /// stays authoritative; a store failure is logged and swallowed.
    async fn persist_history(&self) {
        if self.history.is_empty() {
            return;
        }
        if let Err(err) = self.history_store.store(&self.history.all()).await {
            warn!(error = %err, "Failed to persist history");
        }
    }
}

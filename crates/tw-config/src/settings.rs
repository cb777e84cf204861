//! User-facing engine settings.
//!
//! Every field has a serde default so a missing or partial persisted blob
//! loads cleanly; `normalize` clamps out-of-range values instead of
//! rejecting them.

use serde::{Deserialize, Serialize};
use tw_core::{Pattern, PatternAction};

/// Minimum inactivity limit in minutes.
pub const MIN_TIME_LIMIT_MINUTES: u32 = 1;
/// Maximum inactivity limit in minutes (24 hours).
pub const MAX_TIME_LIMIT_MINUTES: u32 = 1440;

const DEFAULT_TIME_LIMIT_MINUTES: u32 = 2;
const DEFAULT_UNLOAD_TIMEOUT_MINUTES: u32 = 30;

/// Fallback applied when no pattern matches a tab's URL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultBehavior {
    /// Close only the oldest tab sharing the exact URL.
    Duplicate,
    /// Close only the oldest tab sharing the URL minus query.
    #[default]
    DuplicateNoQuery,
    /// Close only the oldest tab sharing the hostname.
    DuplicateDomain,
    /// Close any tab past the inactivity limit.
    Always,
    /// Never close via the inactivity sweep.
    Never,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Inactivity limit before a tab becomes eligible for closing.
    #[serde(default = "default_time_limit")]
    pub time_limit_minutes: u32,
    /// Interval between scheduled unload passes.
    #[serde(default = "default_unload_timeout")]
    pub unload_timeout_minutes: u32,
    /// Whether the reaper removes tabs discarded for over 24 hours.
    #[serde(default = "default_enabled")]
    pub auto_kill_unloaded: bool,
    #[serde(default)]
    pub default_behavior: DefaultBehavior,
    #[serde(default = "default_enabled")]
    pub show_notifications: bool,
    /// Legacy URL whitelist, kept for persisted data written before
    /// patterns existed. Merged as keep-patterns ahead of `patterns`.
    #[serde(default)]
    pub whitelist: Vec<String>,
    /// Ordered rule list; serialized last so the TOML array-of-tables
    /// follows all plain values.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<Pattern>,
}

fn default_enabled() -> bool {
    true
}

fn default_time_limit() -> u32 {
    DEFAULT_TIME_LIMIT_MINUTES
}

fn default_unload_timeout() -> u32 {
    DEFAULT_UNLOAD_TIMEOUT_MINUTES
}

fn default_patterns() -> Vec<Pattern> {
    vec![Pattern::preset("about:*", PatternAction::Keep)]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            time_limit_minutes: DEFAULT_TIME_LIMIT_MINUTES,
            unload_timeout_minutes: DEFAULT_UNLOAD_TIMEOUT_MINUTES,
            auto_kill_unloaded: true,
            default_behavior: DefaultBehavior::default(),
            show_notifications: true,
            whitelist: Vec::new(),
            patterns: default_patterns(),
        }
    }
}

impl Settings {
    /// Clamp out-of-range values and restore required presets.
    ///
    /// Called after every load so a hand-edited or stale persisted blob
    /// cannot put the engine into a nonsensical state.
    pub fn normalize(&mut self) {
        self.time_limit_minutes = self
            .time_limit_minutes
            .clamp(MIN_TIME_LIMIT_MINUTES, MAX_TIME_LIMIT_MINUTES);
        if self.unload_timeout_minutes == 0 {
            self.unload_timeout_minutes = DEFAULT_UNLOAD_TIMEOUT_MINUTES;
        }
        // The about:* preset must survive any edit to the pattern list.
        if !self.patterns.iter().any(|p| p.is_preset) {
            self.patterns.insert(0, Pattern::preset("about:*", PatternAction::Keep));
        }
    }

    /// Effective pattern list for one sweep: legacy whitelist entries are
    /// compiled as keep-patterns and take full priority over configured
    /// patterns.
    pub fn merged_patterns(&self) -> Vec<Pattern> {
        let mut merged: Vec<Pattern> = self
            .whitelist
            .iter()
            .map(|expr| Pattern::new(expr.clone(), PatternAction::Keep))
            .collect();
        merged.extend(self.patterns.iter().cloned());
        merged
    }
}

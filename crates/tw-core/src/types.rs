use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Browser-assigned tab identifier.
///
/// Unique within one tab snapshot set; the engine never allocates ids, it
/// only compares and maps the ones the host reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TabId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Point-in-time view of one open tab, supplied by the host per sweep.
///
/// The engine never owns tab objects; a snapshot taken at sweep start may go
/// stale mid-sweep (the tab can vanish concurrently), so every mutating call
/// keyed on `id` must tolerate "tab no longer exists".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub id: TabId,
    pub url: String,
    pub pinned: bool,
    pub active: bool,
    pub discarded: bool,
    pub last_accessed: DateTime<Utc>,
}

/// Action a matched pattern applies to a tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternAction {
    /// Never close the tab.
    Keep,
    /// Close once past the inactivity limit.
    Close,
    /// Close only the oldest tab sharing the exact URL.
    Duplicate,
    /// Close only the oldest tab sharing the URL with the query stripped.
    DuplicateNoQuery,
    /// Close only the oldest tab sharing the hostname.
    DuplicateDomain,
}

impl PatternAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Close => "close",
            Self::Duplicate => "duplicate",
            Self::DuplicateNoQuery => "duplicate-no-query",
            Self::DuplicateDomain => "duplicate-domain",
        }
    }
}

impl std::fmt::Display for PatternAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a pattern expression is matched against a URL.
///
/// The two kinds exist because user rules historically carried both
/// semantics; persisted patterns without a `kind` field default to
/// `Wildcard`, which is also how legacy whitelist entries are compiled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternKind {
    /// Glob-style: `*` matches any sequence, `.` is literal, anchored at
    /// both ends.
    #[default]
    Wildcard,
    /// Raw regular expression, tested unanchored.
    Regex,
}

/// One ordered URL rule. First matching pattern in the list wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub pattern: String,
    pub action: PatternAction,
    #[serde(default)]
    pub is_preset: bool,
    #[serde(default)]
    pub kind: PatternKind,
}

impl Pattern {
    pub fn new(pattern: impl Into<String>, action: PatternAction) -> Self {
        Self {
            pattern: pattern.into(),
            action,
            is_preset: false,
            kind: PatternKind::Wildcard,
        }
    }

    pub fn preset(pattern: impl Into<String>, action: PatternAction) -> Self {
        Self {
            is_preset: true,
            ..Self::new(pattern, action)
        }
    }

    pub fn regex(pattern: impl Into<String>, action: PatternAction) -> Self {
        Self {
            kind: PatternKind::Regex,
            ..Self::new(pattern, action)
        }
    }
}

/// Terminal outcome recorded in the history log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HistoryEventKind {
    /// Tab closed by the inactivity sweep.
    Closed,
    /// Tab discarded by the unload sweep.
    Unloaded,
    /// Long-discarded tab removed by the reaper.
    Killed,
}

impl std::fmt::Display for HistoryEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Unloaded => write!(f, "unloaded"),
            Self::Killed => write!(f, "killed"),
        }
    }
}

/// One entry in the bounded history log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub kind: HistoryEventKind,
}

impl HistoryEntry {
    pub fn new(url: impl Into<String>, timestamp: DateTime<Utc>, kind: HistoryEventKind) -> Self {
        Self {
            url: url.into(),
            timestamp,
            kind,
        }
    }
}

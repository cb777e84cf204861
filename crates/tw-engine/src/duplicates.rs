//! Duplicate-tab detection under three equivalence classes.
//!
//! A tab is closeable as a duplicate only when another open tab shares its
//! equivalence key and every sharer was accessed strictly more recently.
//! Strict comparison matters: if two duplicates carry identical timestamps
//! there is no well-defined "oldest" and closing either could close both.

use serde::{Deserialize, Serialize};
use tw_core::TabSnapshot;
use url::Url;

/// Equivalence rule used to group tabs as duplicates of each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EquivalenceClass {
    /// Full URL string.
    Exact,
    /// URL with the query (and fragment) stripped: scheme + host + path.
    NoQuery,
    /// Hostname only.
    Domain,
}

/// Equivalence key for a URL, or `None` when the URL cannot be parsed
/// (unparseable URLs are never grouped, so never closed as duplicates).
pub fn equivalence_key(url: &str, class: EquivalenceClass) -> Option<String> {
    match class {
        EquivalenceClass::Exact => Some(url.to_string()),
        EquivalenceClass::NoQuery => {
            let parsed = Url::parse(url).ok()?;
            let host = parsed.host_str()?;
            Some(format!("{}://{}{}", parsed.scheme(), host, parsed.path()))
        }
        EquivalenceClass::Domain => {
            let parsed = Url::parse(url).ok()?;
            parsed.host_str().map(str::to_string)
        }
    }
}

/// Whether `tab` is the strictly-oldest member of its equivalence group.
///
/// Requires at least one *other* tab sharing the key; a tab with no
/// duplicates is never closeable under any class, however long idle.
pub fn is_oldest_duplicate(
    tab: &TabSnapshot,
    all_tabs: &[TabSnapshot],
    class: EquivalenceClass,
) -> bool {
    let Some(key) = equivalence_key(&tab.url, class) else {
        return false;
    };

    let mut has_sharer = false;
    for other in all_tabs {
        if other.id == tab.id {
            continue;
        }
        if equivalence_key(&other.url, class).as_deref() != Some(key.as_str()) {
            continue;
        }
        has_sharer = true;
        // A sharer accessed at or before the candidate means the candidate
        // is not strictly oldest.
        if other.last_accessed <= tab.last_accessed {
            return false;
        }
    }

    has_sharer
}

//! Ordered pattern evaluation against tab URLs.
//!
//! Browser-internal pages are protected unconditionally before any pattern
//! is consulted. After that, first match in list order wins; a malformed
//! expression is skipped with a diagnostic and never halts evaluation.

use regex::Regex;
use tracing::warn;
use tw_core::{EngineError, Pattern, PatternAction, PatternKind};

/// Schemes the engine must never touch, regardless of the pattern list.
const PRIVILEGED_SCHEMES: &[&str] = &[
    "about:",
    "chrome:",
    "edge:",
    "moz-extension:",
    "chrome-extension:",
];

/// Whether a URL belongs to a browser-internal page.
pub fn is_privileged_url(url: &str) -> bool {
    PRIVILEGED_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme))
}

/// Resolve the action for `url` against an ordered pattern list.
///
/// Returns `None` when nothing matches; the caller falls back to the
/// configured default behavior.
pub fn resolve_action(url: &str, patterns: &[Pattern]) -> Option<PatternAction> {
    if is_privileged_url(url) {
        return Some(PatternAction::Keep);
    }

    for pattern in patterns {
        match compile(pattern) {
            Ok(re) => {
                if re.is_match(url) {
                    return Some(pattern.action);
                }
            }
            Err(err) => {
                warn!(error = %err, "Skipping malformed pattern");
            }
        }
    }

    None
}

fn compile(pattern: &Pattern) -> Result<Regex, EngineError> {
    let compiled = match pattern.kind {
        PatternKind::Wildcard => Regex::new(&wildcard_to_regex(&pattern.pattern)),
        PatternKind::Regex => Regex::new(&pattern.pattern),
    };
    compiled.map_err(|err| EngineError::InvalidPattern {
        pattern: pattern.pattern.clone(),
        reason: err.to_string(),
    })
}

/// Convert a glob expression to an anchored regex: `*` matches any
/// sequence, every other character is literal.
fn wildcard_to_regex(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 8);
    out.push('^');
    for ch in glob.chars() {
        match ch {
            '*' => out.push_str(".*"),
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }
    out.push('$');
    out
}

//! Inbound tab/window events.
//!
//! Whatever delivers browser events (extension callbacks, IPC, a test
//! harness) translates them into this enum; the controller funnels every
//! variant into the activity ledger and unload tracker.

use serde::{Deserialize, Serialize};
use tw_core::TabId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum TabEvent {
    /// A new tab appeared.
    Created { id: TabId },
    /// A tab gained focus within its window.
    Activated { id: TabId },
    /// A tab's state changed (navigation progress, URL change).
    Updated {
        id: TabId,
        url_changed: bool,
        navigation_complete: bool,
        /// Whether the tab was the active one when the update fired.
        active: bool,
    },
    /// A tab was removed by the user or the browser.
    Removed { id: TabId },
    /// A window gained focus; `active_tab` is that window's active tab,
    /// `None` when focus left the browser entirely.
    WindowFocused { active_tab: Option<TabId> },
}

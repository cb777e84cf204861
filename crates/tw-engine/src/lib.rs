//! Tab lifecycle decision engine.
//!
//! Tracks per-tab activity, evaluates close/keep rules against it, and runs
//! three periodic sweeps (inactivity close, scheduled unload, stale-unload
//! reap) that mutate the tab set through an abstract browser host.

pub mod clock;
pub mod controller;
pub mod duplicates;
pub mod events;
pub mod history;
pub mod host;
pub mod ledger;
pub mod rules;
pub mod scheduler;
pub mod unload;

#[cfg(test)]
mod testutil;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{LifecycleController, SweepReport};
pub use duplicates::{EquivalenceClass, equivalence_key, is_oldest_duplicate};
pub use events::TabEvent;
pub use history::BoundedHistory;
pub use host::{FileHistoryStore, HistoryStore, Notifier, TabHost};
pub use ledger::ActivityLedger;
pub use rules::{is_privileged_url, resolve_action};
pub use scheduler::{EngineCommand, SchedulerHandle, run_scheduler, run_scheduler_with_period};
pub use unload::UnloadTracker;

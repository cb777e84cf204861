//! Shared types and error taxonomy for the TabWarden engine.

pub mod error;
pub mod types;

pub use error::EngineError;
pub use types::{
    HistoryEntry, HistoryEventKind, Pattern, PatternAction, PatternKind, TabId, TabSnapshot,
};

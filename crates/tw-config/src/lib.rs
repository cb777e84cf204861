//! Engine settings: model, defaults, normalization, and the persisted store.

pub mod settings;
pub mod store;

pub use settings::{DefaultBehavior, Settings};
pub use store::{FileSettingsStore, SettingsStore};

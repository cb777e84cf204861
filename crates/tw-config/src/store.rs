//! Persisted settings store.
//!
//! The engine reads settings at the start of every tick and writes them
//! wholesale on save. `FileSettingsStore` is the TOML-on-disk
//! implementation; tests swap in an in-memory fake behind the same trait.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::settings::Settings;

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load settings, falling back to defaults when nothing is persisted.
    /// Loaded settings are already normalized.
    async fn load(&self) -> Result<Settings>;

    /// Persist the full settings blob, replacing whatever was stored.
    async fn save(&self, settings: &Settings) -> Result<()>;
}

/// TOML-file settings store.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No settings file, using defaults");
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings: {}", self.path.display()))?;
        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings: {}", self.path.display()))?;
        settings.normalize();
        Ok(settings)
    }

    async fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings dir: {}", parent.display())
            })?;
        }
        let content =
            toml::to_string_pretty(settings).context("Failed to serialize settings")?;
        let tmp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write settings: {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, &self.path).with_context(|| {
            format!("Failed to replace settings file: {}", self.path.display())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DefaultBehavior;
    use tw_core::{Pattern, PatternAction};

    #[tokio::test]
    async fn test_load_missing_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.toml"));
        let settings = store.load().await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("settings.toml"));

        let mut settings = Settings::default();
        settings.time_limit_minutes = 45;
        settings.default_behavior = DefaultBehavior::Always;
        settings
            .patterns
            .push(Pattern::new("https://docs.example/*", PatternAction::Keep));
        store.save(&settings).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn test_load_normalizes_out_of_range_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "time_limit_minutes = 0\nunload_timeout_minutes = 0\n").unwrap();

        let store = FileSettingsStore::new(&path);
        let settings = store.load().await.unwrap();
        assert_eq!(settings.time_limit_minutes, 1);
        assert_eq!(settings.unload_timeout_minutes, 30);
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "enabled = maybe").unwrap();

        let store = FileSettingsStore::new(&path);
        assert!(store.load().await.is_err());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("settings.toml");
        let store = FileSettingsStore::new(&path);
        store.save(&Settings::default()).await.unwrap();
        assert!(path.exists());
    }
}

//! User preferences and notification state persistence.
//!
//! Settings are held in memory behind a lock and written back explicitly.
//! Notification hysteresis state is passed through to disk on every
//! load/save, since the notification engine reads it before each
//! evaluation and writes it after any mutation.

use std::path::PathBuf;

use quotawatch_core::{AppSettings, NotificationState};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_config_dir, load_json, load_json_or_default, save_json};

const SETTINGS_FILE: &str = "settings.json";
const NOTIFICATION_STATE_FILE: &str = "notification_state.json";

/// Persistent settings store.
///
/// Access is serialized internally; callers never see a lock.
pub struct SettingsStore {
    settings: RwLock<AppSettings>,
    config_dir: PathBuf,
}

impl SettingsStore {
    /// Creates a store with defaults, without touching the disk.
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            settings: RwLock::new(AppSettings::default()),
            config_dir,
        }
    }

    /// Loads settings from the default configuration directory.
    pub async fn load_default() -> Self {
        Self::load(default_config_dir()).await
    }

    /// Loads settings from a configuration directory.
    ///
    /// A missing or corrupt settings file falls back to defaults; the
    /// refresh-interval bound is re-applied so a hand-edited file cannot
    /// smuggle an out-of-range value into memory.
    pub async fn load(config_dir: PathBuf) -> Self {
        let path = config_dir.join(SETTINGS_FILE);
        let mut settings: AppSettings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            match load_json(&path).await {
                Ok(settings) => settings,
                Err(e) => {
                    warn!(error = %e, "Failed to load settings, using defaults");
                    AppSettings::default()
                }
            }
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            AppSettings::default()
        };
        settings.set_refresh_interval(settings.refresh_interval_secs);

        Self {
            settings: RwLock::new(settings),
            config_dir,
        }
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> AppSettings {
        self.settings.read().await.clone()
    }

    /// Mutates settings in memory and writes them back to disk.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the settings file cannot be written.
    pub async fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut AppSettings),
    {
        let snapshot = {
            let mut settings = self.settings.write().await;
            f(&mut settings);
            settings.set_refresh_interval(settings.refresh_interval_secs);
            settings.clone()
        };
        save_json(&self.config_dir.join(SETTINGS_FILE), &snapshot).await?;
        debug!("Settings saved");
        Ok(())
    }

    /// Loads notification hysteresis state from disk.
    ///
    /// Missing or corrupt state decodes to the default (nothing fired yet).
    pub async fn load_notification_state(&self) -> NotificationState {
        load_json_or_default(&self.config_dir.join(NOTIFICATION_STATE_FILE)).await
    }

    /// Persists notification hysteresis state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the state file cannot be written.
    pub async fn save_notification_state(
        &self,
        state: NotificationState,
    ) -> Result<(), StoreError> {
        save_json(&self.config_dir.join(NOTIFICATION_STATE_FILE), &state).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().to_path_buf()).await;

        let settings = store.get().await;
        assert_eq!(settings, AppSettings::default());
    }

    #[tokio::test]
    async fn test_update_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().to_path_buf()).await;

        store
            .update(|s| {
                s.set_refresh_interval(300);
                s.is_first_launch = false;
            })
            .await
            .unwrap();

        let reloaded = SettingsStore::load(dir.path().to_path_buf()).await;
        let settings = reloaded.get().await;
        assert_eq!(settings.refresh_interval_secs, 300);
        assert!(!settings.is_first_launch);
    }

    #[tokio::test]
    async fn test_update_reclamps_interval() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().to_path_buf()).await;

        store
            .update(|s| s.refresh_interval_secs = 5)
            .await
            .unwrap();

        assert_eq!(store.get().await.refresh_interval_secs, 60);
    }

    #[tokio::test]
    async fn test_hand_edited_interval_reclamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        tokio::fs::write(&path, r#"{"refresh_interval_secs": 5}"#)
            .await
            .unwrap();

        let store = SettingsStore::load(dir.path().to_path_buf()).await;
        assert_eq!(store.get().await.refresh_interval_secs, 60);
    }

    #[tokio::test]
    async fn test_notification_state_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().to_path_buf()).await;

        assert_eq!(
            store.load_notification_state().await,
            NotificationState::default()
        );

        let state = NotificationState {
            warning_notified: true,
            critical_notified: false,
            last_percentage: 80.0,
        };
        store.save_notification_state(state).await.unwrap();

        assert_eq!(store.load_notification_state().await, state);
    }

    #[tokio::test]
    async fn test_corrupt_notification_state_decodes_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(NOTIFICATION_STATE_FILE);
        tokio::fs::write(&path, "{broken").await.unwrap();

        let store = SettingsStore::load(dir.path().to_path_buf()).await;
        assert_eq!(
            store.load_notification_state().await,
            NotificationState::default()
        );
    }
}

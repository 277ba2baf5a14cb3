//! Top-level application state machine.
//!
//! Owns the setup-vs-ready decision, the session-key validation flow, and
//! the refresh flow. Fetch failures after setup never demote the app back
//! to the setup state; they surface as an error message while the state
//! stays ready. Overlapping refresh requests are gated, not queued: a
//! request arriving while one is in flight returns immediately.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use quotawatch_api::KEYCHAIN_ACCOUNT;
use quotawatch_core::{AppError, AppSettings, SessionKey, UsageSnapshot};
use quotawatch_store::{SecretStore, SettingsStore, UsageCache};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::notifications::NotificationService;
use crate::usage_service::UsageProvider;

// ============================================================================
// Model State
// ============================================================================

#[derive(Default)]
struct ModelState {
    is_setup_complete: bool,
    usage: Option<UsageSnapshot>,
    error_message: Option<String>,
}

// ============================================================================
// App Model
// ============================================================================

/// Application state machine over the acquisition and notification services.
///
/// Mutable state lives behind an internal lock; the refresh gate keeps
/// overlapping fetches from racing each other. Intended to be shared as an
/// `Arc` between the UI/CLI caller and any polling task.
pub struct AppModel {
    provider: Arc<dyn UsageProvider>,
    notifications: Arc<NotificationService>,
    secret_store: Arc<dyn SecretStore>,
    settings_store: Arc<SettingsStore>,
    cache: Arc<UsageCache>,
    state: RwLock<ModelState>,
    refresh_in_flight: AtomicBool,
}

impl AppModel {
    /// Wires the model to its collaborators.
    pub fn new(
        provider: Arc<dyn UsageProvider>,
        notifications: Arc<NotificationService>,
        secret_store: Arc<dyn SecretStore>,
        settings_store: Arc<SettingsStore>,
        cache: Arc<UsageCache>,
    ) -> Self {
        Self {
            provider,
            notifications,
            secret_store,
            settings_store,
            cache,
            state: RwLock::new(ModelState::default()),
            refresh_in_flight: AtomicBool::new(false),
        }
    }

    /// Whether setup has completed (a session key is stored).
    pub async fn is_setup_complete(&self) -> bool {
        self.state.read().await.is_setup_complete
    }

    /// The currently displayed snapshot, if any.
    pub async fn usage(&self) -> Option<UsageSnapshot> {
        self.state.read().await.usage.clone()
    }

    /// The current user-visible error message, if any.
    pub async fn error_message(&self) -> Option<String> {
        self.state.read().await.error_message.clone()
    }

    /// Whether a refresh is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        self.refresh_in_flight.load(Ordering::SeqCst)
    }

    /// A copy of the current settings.
    pub async fn settings(&self) -> AppSettings {
        self.settings_store.get().await
    }

    /// Decides between the setup and ready states at startup.
    ///
    /// Without a stored session key the app needs setup and no network call
    /// is attempted. With one, the app is ready and an initial fetch runs;
    /// if that fetch fails the app stays ready with an error message.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self) {
        if !self.secret_store.exists(KEYCHAIN_ACCOUNT).await {
            debug!("No session key stored, setup required");
            self.state.write().await.is_setup_complete = false;
            return;
        }

        self.state.write().await.is_setup_complete = true;
        self.refresh_usage(false).await;
    }

    /// Validates a pasted session key and completes setup with it.
    ///
    /// Nothing is persisted until the key has passed format validation, the
    /// server accepts it, and at least one organization is reachable. On
    /// success the key lands in the secret store, the first organization's
    /// id is cached in settings, the first-launch flag clears, and an
    /// initial fetch runs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::KeyFormat`], [`AppError::KeyRejected`], or
    /// [`AppError::OrganizationNotFound`] with the app still in the setup
    /// state; network failures during validation propagate unchanged.
    #[instrument(skip_all)]
    pub async fn validate_and_save_session_key(&self, raw: &str) -> Result<(), AppError> {
        let key = SessionKey::new(raw)?;

        if !self.provider.validate_session_key(&key).await? {
            return Err(AppError::KeyRejected);
        }

        let organizations = self.provider.fetch_organizations(&key).await?;
        let Some(first) = organizations.first() else {
            return Err(AppError::OrganizationNotFound);
        };

        self.secret_store
            .save(key.value(), KEYCHAIN_ACCOUNT)
            .await
            .map_err(|e| AppError::Keychain(e.to_string()))?;

        let organization_id = first.uuid;
        self.settings_store
            .update(|s| {
                s.cached_organization_id = Some(organization_id);
                s.is_first_launch = false;
            })
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        info!(organization = %first.name, "Session key saved, setup complete");
        self.state.write().await.is_setup_complete = true;
        self.refresh_usage(false).await;
        Ok(())
    }

    /// Refreshes the displayed snapshot through the acquisition service.
    ///
    /// Before setup this only zeroes any stale displayed data. On success
    /// the snapshot is displayed, the error clears, and the notification
    /// engine evaluates it; on failure the displayed snapshot clears rather
    /// than silently showing stale data, and the engine is not invoked.
    #[instrument(skip(self))]
    pub async fn refresh_usage(&self, force_refresh: bool) {
        if !self.state.read().await.is_setup_complete {
            self.state.write().await.usage = None;
            return;
        }

        if self.refresh_in_flight.swap(true, Ordering::SeqCst) {
            debug!("Refresh already in flight, ignoring request");
            return;
        }

        match self.provider.fetch_usage(force_refresh).await {
            Ok(snapshot) => {
                {
                    let mut state = self.state.write().await;
                    state.usage = Some(snapshot.clone());
                    state.error_message = None;
                }
                let settings = self.settings_store.get().await;
                self.notifications
                    .evaluate_thresholds(&snapshot, &settings)
                    .await;
            }
            Err(e) => {
                warn!(error = %e, "Usage refresh failed");
                let mut state = self.state.write().await;
                state.usage = None;
                state.error_message = Some(e.to_string());
            }
        }

        self.refresh_in_flight.store(false, Ordering::SeqCst);
    }

    /// Deletes the stored session key and returns to the setup state.
    ///
    /// Drops the cached organization id, restores the first-launch flag,
    /// clears the displayed snapshot and error, and invalidates the fresh
    /// cache slot. Last-known cache data survives for a later offline
    /// display.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Keychain`] or [`AppError::Storage`] if a store
    /// rejects the update.
    #[instrument(skip(self))]
    pub async fn clear_session_key(&self) -> Result<(), AppError> {
        self.secret_store
            .delete(KEYCHAIN_ACCOUNT)
            .await
            .map_err(|e| AppError::Keychain(e.to_string()))?;

        self.settings_store
            .update(|s| {
                s.cached_organization_id = None;
                s.is_first_launch = true;
            })
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        self.cache.invalidate().await;

        let mut state = self.state.write().await;
        state.is_setup_complete = false;
        state.usage = None;
        state.error_message = None;

        info!("Session key cleared");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

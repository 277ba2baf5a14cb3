//! Usage acquisition service.
//!
//! Orchestrates one fetch cycle: credential lookup, cache consultation,
//! organization resolution, the network request, response mapping, and the
//! cache update. Within one call, cache-read happens before the network
//! call, which happens before the cache-write. No retries; repeated polling
//! is the caller's job.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use quotawatch_api::{
    map_usage, parse_organizations, usage_endpoint, HttpMethod, RequestExecutor,
    KEYCHAIN_ACCOUNT, ORGANIZATIONS_ENDPOINT,
};
use quotawatch_core::{
    AppError, MappingError, NetworkError, Organization, SessionKey, UsageSnapshot,
};
use quotawatch_store::{KeychainError, SecretStore, SettingsStore, UsageCache};
use tracing::{debug, instrument, warn};

// ============================================================================
// Provider Trait
// ============================================================================

/// Usage acquisition operations, as seen by the app model.
#[async_trait]
pub trait UsageProvider: Send + Sync {
    /// Fetches the current usage snapshot.
    ///
    /// With `force_refresh` false, a fresh cache entry is returned without
    /// any network traffic.
    async fn fetch_usage(&self, force_refresh: bool) -> Result<UsageSnapshot, AppError>;

    /// Checks whether the server accepts a session key.
    ///
    /// A server-side rejection is `Ok(false)`; only transport failures are
    /// errors.
    async fn validate_session_key(&self, key: &SessionKey) -> Result<bool, AppError>;

    /// Lists organizations reachable with a session key.
    ///
    /// An empty list is valid output here; callers decide whether that is
    /// an error.
    async fn fetch_organizations(&self, key: &SessionKey) -> Result<Vec<Organization>, AppError>;
}

// ============================================================================
// Usage Service
// ============================================================================

/// Production [`UsageProvider`] over the request executor and stores.
pub struct UsageService {
    executor: Arc<dyn RequestExecutor>,
    cache: Arc<UsageCache>,
    secret_store: Arc<dyn SecretStore>,
    settings_store: Arc<SettingsStore>,
}

impl UsageService {
    /// Wires the service to its collaborators.
    pub fn new(
        executor: Arc<dyn RequestExecutor>,
        cache: Arc<UsageCache>,
        secret_store: Arc<dyn SecretStore>,
        settings_store: Arc<SettingsStore>,
    ) -> Self {
        Self {
            executor,
            cache,
            secret_store,
            settings_store,
        }
    }

    async fn load_session_key(&self) -> Result<SessionKey, AppError> {
        let secret = self
            .secret_store
            .retrieve(KEYCHAIN_ACCOUNT)
            .await
            .map_err(|e| match e {
                KeychainError::NotFound(_) => AppError::NoSessionKey,
                other => AppError::Keychain(other.to_string()),
            })?;
        Ok(SessionKey::new(&secret)?)
    }
}

#[async_trait]
impl UsageProvider for UsageService {
    #[instrument(skip(self))]
    async fn fetch_usage(&self, force_refresh: bool) -> Result<UsageSnapshot, AppError> {
        let key = self.load_session_key().await?;

        if !force_refresh {
            if let Some(cached) = self.cache.get().await {
                debug!("Serving usage from cache");
                return Ok(cached);
            }
        }

        // Organization resolution is a setup-time precondition; it is not
        // retried inline here.
        let settings = self.settings_store.get().await;
        let organization_id = settings
            .cached_organization_id
            .ok_or(AppError::OrganizationNotFound)?;

        let body = self
            .executor
            .request(&usage_endpoint(&organization_id), HttpMethod::Get, &key)
            .await?;

        // A bad response must never poison the cache, so mapping failures
        // propagate before any cache write.
        let wire = serde_json::from_slice(&body)
            .map_err(|e| AppError::MalformedResponse(MappingError::Json(e)))?;
        let snapshot = map_usage(&wire, Utc::now()).map_err(AppError::MalformedResponse)?;

        self.cache.set(snapshot.clone()).await;
        debug!(
            session = snapshot.session.percentage(),
            weekly = snapshot.weekly.percentage(),
            "Usage fetched"
        );
        Ok(snapshot)
    }

    async fn validate_session_key(&self, key: &SessionKey) -> Result<bool, AppError> {
        match self
            .executor
            .request(ORGANIZATIONS_ENDPOINT, HttpMethod::Get, key)
            .await
        {
            Ok(_) => Ok(true),
            Err(NetworkError::RequestFailed(cause)) => {
                Err(AppError::Network(NetworkError::RequestFailed(cause)))
            }
            Err(e) => {
                warn!(error = %e, "Session key rejected by server");
                Ok(false)
            }
        }
    }

    async fn fetch_organizations(&self, key: &SessionKey) -> Result<Vec<Organization>, AppError> {
        let body = self
            .executor
            .request(ORGANIZATIONS_ENDPOINT, HttpMethod::Get, key)
            .await?;
        parse_organizations(&body).map_err(AppError::MalformedResponse)
    }
}

// ============================================================================
// Tests
// ============================================================================

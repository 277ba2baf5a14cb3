//! Reqwest-backed request executor.

use std::time::Duration;

use async_trait::async_trait;
use quotawatch_core::{NetworkError, SessionKey};
use reqwest::{header, Client};
use tracing::{debug, warn};

use crate::executor::{HttpMethod, RequestExecutor};

/// Base URL for the usage-metering API.
pub const API_BASE_URL: &str = "https://claude.ai/api";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the usage-metering API.
///
/// The session key is presented as a cookie, matching how the web client
/// authenticates. No retries; a timed-out request surfaces through the same
/// [`NetworkError::RequestFailed`] channel as any other transport failure.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client against the production API.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::RequestFailed`] if the underlying client
    /// cannot be built (broken TLS configuration).
    pub fn new() -> Result<Self, NetworkError> {
        Self::with_base_url(API_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::RequestFailed`] if the underlying client
    /// cannot be built.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, NetworkError> {
        let inner = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("quotawatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NetworkError::RequestFailed(e.to_string()))?;

        Ok(Self {
            inner,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl RequestExecutor for ApiClient {
    async fn request(
        &self,
        path: &str,
        method: HttpMethod,
        key: &SessionKey,
    ) -> Result<Vec<u8>, NetworkError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, ?method, "Executing API request");

        let builder = match method {
            HttpMethod::Get => self.inner.get(&url),
            HttpMethod::Post => self.inner.post(&url),
        };

        let response = builder
            .header(header::COOKIE, format!("sessionKey={}", key.value()))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| NetworkError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, url = %url, "API request rejected");
            return Err(NetworkError::HttpStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| NetworkError::InvalidResponse(e.to_string()))?;

        debug!(len = body.len(), "Received API response");
        Ok(body.to_vec())
    }
}

// ============================================================================
// Tests
// ============================================================================

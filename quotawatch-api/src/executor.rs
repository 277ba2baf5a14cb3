//! Request executor abstraction.
//!
//! The acquisition layer depends on this trait rather than on any concrete
//! HTTP client, so tests can substitute a recording fake and the transport
//! can be swapped without touching orchestration code.

use async_trait::async_trait;
use quotawatch_core::{NetworkError, SessionKey};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request.
    Get,
    /// POST request.
    Post,
}

/// Executes authenticated requests against the usage-metering API.
///
/// Implementations own timeout policy; they do not retry. A non-success
/// status is reported as [`NetworkError::HttpStatus`] so callers can tell a
/// server-side rejection from a transport failure.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Executes a request and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError`] on transport failure or a non-success
    /// status.
    async fn request(
        &self,
        path: &str,
        method: HttpMethod,
        key: &SessionKey,
    ) -> Result<Vec<u8>, NetworkError>;
}

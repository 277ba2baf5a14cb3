//! Core error types for `QuotaWatch`.
//!
//! The error taxonomy is layered: [`SessionKeyError`], [`MappingError`], and
//! [`NetworkError`] describe failures at a single seam, while [`AppError`]
//! is the application-level type surfaced to the user. Every variant maps to
//! exactly one human-readable message, and recoverability is a static
//! property of the variant.

use thiserror::Error;

/// Errors raised by the [`crate::SessionKey`] validating constructor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionKeyError {
    /// Key does not carry the required prefix.
    #[error("Session key must start with 'sk-ant-'")]
    InvalidPrefix,

    /// Key is shorter than the minimum plausible length.
    #[error("Session key is too short")]
    TooShort,
}

/// Errors raised while converting a wire-format payload into domain types.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A load-bearing field was absent or could not be parsed.
    #[error("Server response missing or invalid field: {0}")]
    MissingOrInvalidField(&'static str),

    /// The response body was not the expected JSON shape.
    #[error("Invalid response body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the request executor.
///
/// The split between [`NetworkError::RequestFailed`] and
/// [`NetworkError::HttpStatus`] is load-bearing: session-key validation
/// treats a status rejection as "key invalid" while a transport failure
/// propagates to the caller.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Transport-layer failure (DNS, connect, timeout).
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The server answered with a non-success status code.
    #[error("Server returned status {0}")]
    HttpStatus(u16),

    /// The server answered with something that is not a usable body.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Application-level errors with user-facing messages.
#[derive(Debug, Error)]
pub enum AppError {
    /// No session key stored; setup has not completed.
    #[error("No session key found. Please complete setup.")]
    NoSessionKey,

    /// The session key failed format validation.
    #[error(transparent)]
    KeyFormat(#[from] SessionKeyError),

    /// The server rejected the session key.
    #[error("Session key is invalid or expired. Please update in settings.")]
    KeyRejected,

    /// Network request failed.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Usage payload could not be mapped into the domain model.
    #[error("Unable to parse usage data from server.")]
    MalformedResponse(#[source] MappingError),

    /// No organizations are reachable with this account.
    #[error("No organizations found for this account.")]
    OrganizationNotFound,

    /// Secure storage failed.
    #[error("Keychain error: {0}")]
    Keychain(String),

    /// Settings could not be persisted.
    #[error("Failed to save settings: {0}")]
    Storage(String),

    /// Persisted cache could not be decoded; treated as a cache miss.
    #[error("Cached data is corrupted. Fetching fresh data...")]
    CacheCorrupted,
}

impl AppError {
    /// Whether the error can resolve itself on retry, without user action.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Network(_) | AppError::MalformedResponse(_) | AppError::CacheCorrupted
        )
    }

    /// Suggested user action, for errors that need one.
    pub fn recovery_action(&self) -> Option<&'static str> {
        match self {
            AppError::NoSessionKey => Some("Complete Setup"),
            AppError::KeyFormat(_) | AppError::KeyRejected => Some("Update Session Key"),
            AppError::Network(_) => Some("Retry"),
            AppError::OrganizationNotFound => Some("Check Account"),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

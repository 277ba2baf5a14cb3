//! Session key and organization types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionKeyError;

/// Minimum plausible session key length, including the prefix.
const MIN_KEY_LENGTH: usize = 11;

/// Required session key prefix.
const KEY_PREFIX: &str = "sk-ant-";

// ============================================================================
// Session Key
// ============================================================================

/// Validated Claude session key.
///
/// Deliberately not serializable so the secret can only leave the process
/// through the secret store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKey {
    value: String,
    /// Organization resolved for this key during setup, if any.
    pub organization_id: Option<Uuid>,
}

impl SessionKey {
    /// Validates and constructs a session key.
    ///
    /// Trims surrounding whitespace, then requires the `sk-ant-` prefix and
    /// a minimum length.
    ///
    /// # Errors
    ///
    /// Returns [`SessionKeyError`] if the format check fails.
    pub fn new(raw: &str) -> Result<Self, SessionKeyError> {
        let trimmed = raw.trim();

        if !trimmed.starts_with(KEY_PREFIX) {
            return Err(SessionKeyError::InvalidPrefix);
        }
        if trimmed.len() < MIN_KEY_LENGTH {
            return Err(SessionKeyError::TooShort);
        }

        Ok(Self {
            value: trimmed.to_string(),
            organization_id: None,
        })
    }

    /// The secret key material.
    pub fn value(&self) -> &str {
        &self.value
    }
}

// ============================================================================
// Organization
// ============================================================================

/// Claude organization account reachable with a session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Integer ID.
    pub id: i64,
    /// UUID identifier, used to build the usage endpoint path.
    pub uuid: Uuid,
    /// Organization display name.
    pub name: String,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_key() {
        let key = SessionKey::new("sk-ant-test-session-key").unwrap();
        assert_eq!(key.value(), "sk-ant-test-session-key");
        assert!(key.organization_id.is_none());
    }

    #[test]
    fn test_key_is_trimmed() {
        let key = SessionKey::new("  sk-ant-test-session-key\n").unwrap();
        assert_eq!(key.value(), "sk-ant-test-session-key");
    }

    #[test]
    fn test_wrong_prefix_rejected() {
        assert_eq!(
            SessionKey::new("sk-oai-something"),
            Err(SessionKeyError::InvalidPrefix)
        );
    }

    #[test]
    fn test_short_key_rejected() {
        assert_eq!(SessionKey::new("sk-ant-x"), Err(SessionKeyError::TooShort));
    }

    #[test]
    fn test_organization_deserializes() {
        let json = r#"{
            "id": 1,
            "uuid": "e4c9b3e0-7c4b-4c4b-a1e0-111111111111",
            "name": "Test Org"
        }"#;
        let org: Organization = serde_json::from_str(json).unwrap();
        assert_eq!(org.id, 1);
        assert_eq!(org.name, "Test Org");
    }
}

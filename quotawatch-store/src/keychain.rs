//! Secure session key storage.
//!
//! The [`SecretStore`] trait abstracts the system keychain:
//! - macOS: Keychain Services
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KDE Wallet)
//!
//! [`KeyringStore`] is the production implementation. [`MemorySecretStore`]
//! exists for tests and for headless environments without a secret service.

use std::collections::HashMap;

use async_trait::async_trait;
use keyring::Entry;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::KeychainError;

/// Keychain service name for `QuotaWatch` credentials.
const SERVICE_NAME: &str = "com.quotawatch.sessionkey";

// ============================================================================
// Secret Store Trait
// ============================================================================

/// Secure storage for the session key.
///
/// Single-credential model: the account key is a fixed literal chosen by
/// the caller (typically `"default"`).
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Stores a secret under the given account, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns [`KeychainError`] if the platform store rejects the write.
    async fn save(&self, secret: &str, account: &str) -> Result<(), KeychainError>;

    /// Retrieves the secret for an account.
    ///
    /// # Errors
    ///
    /// Returns [`KeychainError::NotFound`] if nothing is stored.
    async fn retrieve(&self, account: &str) -> Result<String, KeychainError>;

    /// Deletes the secret for an account. Deleting a missing entry is fine.
    ///
    /// # Errors
    ///
    /// Returns [`KeychainError`] if the platform store rejects the delete.
    async fn delete(&self, account: &str) -> Result<(), KeychainError>;

    /// Whether a secret exists for an account.
    async fn exists(&self, account: &str) -> bool;
}

// ============================================================================
// System Keychain
// ============================================================================

/// [`SecretStore`] backed by the system keychain.
///
/// The keyring crate is blocking, so every operation hops onto the blocking
/// pool.
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    /// Creates a store using the default service name.
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Creates a store with a custom service name.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, account: &str) -> Result<Entry, KeychainError> {
        Ok(Entry::new(&self.service, account)?)
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for KeyringStore {
    async fn save(&self, secret: &str, account: &str) -> Result<(), KeychainError> {
        let entry = self.entry(account)?;
        let secret = secret.to_string();
        let account = account.to_string();
        tokio::task::spawn_blocking(move || entry.set_password(&secret))
            .await
            .map_err(|e| KeychainError::Other(e.to_string()))??;
        debug!(account = %account, "Session key stored in keychain");
        Ok(())
    }

    async fn retrieve(&self, account: &str) -> Result<String, KeychainError> {
        let entry = self.entry(account)?;
        let account = account.to_string();
        let secret = tokio::task::spawn_blocking(move || entry.get_password())
            .await
            .map_err(|e| KeychainError::Other(e.to_string()))?
            .map_err(|e| match e {
                keyring::Error::NoEntry => KeychainError::NotFound(account),
                other => other.into(),
            })?;
        Ok(secret)
    }

    async fn delete(&self, account: &str) -> Result<(), KeychainError> {
        let entry = self.entry(account)?;
        let result = tokio::task::spawn_blocking(move || entry.delete_credential())
            .await
            .map_err(|e| KeychainError::Other(e.to_string()))?;
        match result {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, account: &str) -> bool {
        self.retrieve(account).await.is_ok()
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// In-memory [`SecretStore`] for tests and keychain-less environments.
#[derive(Default)]
pub struct MemorySecretStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySecretStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn save(&self, secret: &str, account: &str) -> Result<(), KeychainError> {
        self.entries
            .write()
            .await
            .insert(account.to_string(), secret.to_string());
        Ok(())
    }

    async fn retrieve(&self, account: &str) -> Result<String, KeychainError> {
        self.entries
            .read()
            .await
            .get(account)
            .cloned()
            .ok_or_else(|| KeychainError::NotFound(account.to_string()))
    }

    async fn delete(&self, account: &str) -> Result<(), KeychainError> {
        self.entries.write().await.remove(account);
        Ok(())
    }

    async fn exists(&self, account: &str) -> bool {
        self.entries.read().await.contains_key(account)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemorySecretStore::new();

        assert!(!store.exists("default").await);
        assert!(matches!(
            store.retrieve("default").await,
            Err(KeychainError::NotFound(_))
        ));

        store.save("sk-ant-test-key", "default").await.unwrap();
        assert!(store.exists("default").await);
        assert_eq!(store.retrieve("default").await.unwrap(), "sk-ant-test-key");

        store.delete("default").await.unwrap();
        assert!(!store.exists("default").await);
    }

    #[tokio::test]
    async fn test_memory_store_save_overwrites() {
        let store = MemorySecretStore::new();
        store.save("sk-ant-old", "default").await.unwrap();
        store.save("sk-ant-new", "default").await.unwrap();
        assert_eq!(store.retrieve("default").await.unwrap(), "sk-ant-new");
    }

    #[tokio::test]
    async fn test_memory_store_delete_missing_is_ok() {
        let store = MemorySecretStore::new();
        assert!(store.delete("default").await.is_ok());
    }

    #[test]
    fn test_keyring_service_name() {
        let store = KeyringStore::new();
        assert_eq!(store.service, SERVICE_NAME);

        let custom = KeyringStore::with_service("com.example.test");
        assert_eq!(custom.service, "com.example.test");
    }

    // Actual keychain operations require platform access and belong in
    // integration tests on a real desktop session.
}

// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `QuotaWatch` Store
//!
//! Storage for the `QuotaWatch` application.
//!
//! This crate provides:
//!
//! - **`SecretStore`**: trait over secure credential storage, with a system
//!   keychain implementation and an in-memory one for tests and
//!   keychain-less environments
//! - **`SettingsStore`**: user preferences and notification hysteresis
//!   state, persisted as JSON
//! - **`UsageCache`**: two-tier snapshot cache (TTL-gated fresh slot plus a
//!   TTL-ignoring last-known slot)
//! - **Persistence**: atomic JSON file I/O with restrictive permissions
//!
//! Every stateful component here serializes its own access internally;
//! no locks are exposed to callers.

pub mod cache;
pub mod error;
pub mod keychain;
pub mod persistence;
pub mod settings_store;

pub use cache::UsageCache;
pub use error::{KeychainError, StoreError};
pub use keychain::{KeyringStore, MemorySecretStore, SecretStore};
pub use persistence::{default_config_dir, load_json, load_json_or_default, save_json};
pub use settings_store::SettingsStore;

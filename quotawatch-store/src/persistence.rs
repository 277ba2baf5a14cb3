//! Atomic JSON file I/O.
//!
//! Settings and notification state land on disk through these helpers:
//! pretty-printed JSON, written to a temp file and renamed into place, with
//! owner-only permissions on Unix.

use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/QuotaWatch`
/// - Linux: `~/.config/quotawatch`
/// - Windows: `%APPDATA%\QuotaWatch`
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| {
                h.join("Library")
                    .join("Application Support")
                    .join("QuotaWatch")
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .map(|c| c.join("quotawatch"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

// ============================================================================
// File Permissions
// ============================================================================

/// Restricts a file to owner read/write (0600) on Unix.
#[cfg(unix)]
async fn restrict_file_mode(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0600", "Restricted file permissions");
    Ok(())
}

/// Restricts a directory to owner access (0700) on Unix.
#[cfg(unix)]
async fn restrict_dir_mode(path: &Path) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o700);
    tokio::fs::set_permissions(path, perms).await?;

    debug!(path = %path.display(), mode = "0700", "Restricted directory permissions");
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn restrict_file_mode(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

/// No-op for non-Unix systems.
#[cfg(not(unix))]
async fn restrict_dir_mode(_path: &Path) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// File Operations
// ============================================================================

async fn ensure_parent_dir(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            debug!(path = %parent.display(), "Creating config directory");
            tokio::fs::create_dir_all(parent).await?;
            restrict_dir_mode(parent).await?;
        }
    }
    Ok(())
}

/// Saves a value as pretty-printed JSON.
///
/// Creates parent directories as needed, writes through a temp file and
/// rename so a crash mid-write never leaves a truncated file, and restricts
/// permissions on Unix.
///
/// # Errors
///
/// Returns [`StoreError`] on serialization or filesystem failure.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    ensure_parent_dir(path).await?;

    let json = serde_json::to_string_pretty(data)?;

    let temp_path = path.with_extension("json.tmp");
    tokio::fs::write(&temp_path, &json).await?;
    tokio::fs::rename(&temp_path, path).await?;

    restrict_file_mode(path).await?;

    debug!(path = %path.display(), "JSON file saved");
    Ok(())
}

/// Loads a value from a JSON file.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read or decoded.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;

    debug!(path = %path.display(), "JSON file loaded");
    Ok(data)
}

/// Loads a value from a JSON file, falling back to the default.
///
/// A corrupt file is treated the same as a missing one; only corruption is
/// worth a warning.
pub async fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path).await {
        Ok(data) => data,
        Err(e) => {
            if !matches!(e, StoreError::Io(_)) {
                warn!(path = %path.display(), error = %e, "Failed to load, using defaults");
            }
            T::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

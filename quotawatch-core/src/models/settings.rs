//! User preferences.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lower bound for the refresh interval, in seconds.
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 60;
/// Upper bound for the refresh interval, in seconds.
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 600;

// ============================================================================
// Notification Thresholds
// ============================================================================

/// Percentage thresholds for usage notifications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationThresholds {
    /// Warning notification fires at this percentage.
    pub warning: f64,
    /// Critical notification fires at this percentage.
    pub critical: f64,
    /// Whether to notify when the session window resets to zero.
    pub notify_on_reset: bool,
}

impl Default for NotificationThresholds {
    fn default() -> Self {
        Self {
            warning: 75.0,
            critical: 90.0,
            notify_on_reset: false,
        }
    }
}

// ============================================================================
// App Settings
// ============================================================================

/// User preferences and app configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Refresh interval in seconds, always within [60, 600].
    pub refresh_interval_secs: u64,

    /// Whether notifications are enabled.
    pub notifications_enabled: bool,

    /// Notification thresholds.
    pub thresholds: NotificationThresholds,

    /// Whether this is the first launch (setup not yet completed).
    pub is_first_launch: bool,

    /// Organization resolved at setup time, cached to avoid repeated
    /// organization-list calls.
    pub cached_organization_id: Option<Uuid>,

    /// Whether to show sonnet sub-quota usage.
    pub show_sonnet_usage: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: MIN_REFRESH_INTERVAL_SECS,
            notifications_enabled: true,
            thresholds: NotificationThresholds::default(),
            is_first_launch: true,
            cached_organization_id: None,
            show_sonnet_usage: false,
        }
    }
}

impl AppSettings {
    /// Sets the refresh interval, clamping into the valid range.
    ///
    /// The invariant is enforced on write so an out-of-range value is never
    /// stored.
    pub fn set_refresh_interval(&mut self, secs: u64) {
        self.refresh_interval_secs =
            secs.clamp(MIN_REFRESH_INTERVAL_SECS, MAX_REFRESH_INTERVAL_SECS);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.refresh_interval_secs, 60);
        assert!(settings.notifications_enabled);
        assert!(settings.is_first_launch);
        assert!(settings.cached_organization_id.is_none());
        assert_eq!(settings.thresholds.warning, 75.0);
        assert_eq!(settings.thresholds.critical, 90.0);
    }

    #[test]
    fn test_refresh_interval_clamped_on_write() {
        let mut settings = AppSettings::default();

        settings.set_refresh_interval(10);
        assert_eq!(settings.refresh_interval_secs, 60);

        settings.set_refresh_interval(120);
        assert_eq!(settings.refresh_interval_secs, 120);

        settings.set_refresh_interval(100_000);
        assert_eq!(settings.refresh_interval_secs, 600);
    }

    #[test]
    fn test_partial_settings_file_loads() {
        // Older settings files without newer fields keep loading.
        let json = r#"{"refresh_interval_secs": 120}"#;
        let settings: AppSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.refresh_interval_secs, 120);
        assert!(settings.notifications_enabled);
    }
}

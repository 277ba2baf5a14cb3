//! Usage-related types.
//!
//! This module contains the types produced by a successful usage fetch:
//! - [`UsageSnapshot`] - Aggregate of all quota windows
//! - [`UsageWindow`] - A single rolling quota window
//! - [`UsageStatus`] - Safe/warning/critical classification

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Usage Window
// ============================================================================

/// A single rolling usage window (session, weekly, or sonnet).
///
/// The wire format reports utilization as a percentage, so the window keeps
/// a constant limit of 100 and the utilization acts as the numerator.
/// Immutable value; rebuilt on every successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageWindow {
    /// Amount used against `limit` (0-100 on the percentage basis).
    pub utilization: f64,
    /// Quota denominator; constant 100 for percentage-based windows.
    pub limit: f64,
    /// When this window resets.
    pub resets_at: DateTime<Utc>,
}

impl UsageWindow {
    /// Creates a window on the percentage basis (limit 100).
    pub fn new(utilization: f64, resets_at: DateTime<Utc>) -> Self {
        Self {
            utilization,
            limit: 100.0,
            resets_at,
        }
    }

    /// Percentage of the quota used, clamped to [0, 100].
    pub fn percentage(&self) -> f64 {
        if self.limit <= 0.0 {
            return 0.0;
        }
        (self.utilization / self.limit * 100.0).clamp(0.0, 100.0)
    }

    /// Remaining percentage (100 - used).
    pub fn remaining_percent(&self) -> f64 {
        100.0 - self.percentage()
    }

    /// Time until this window resets, if the reset is in the future.
    pub fn time_until_reset(&self, now: DateTime<Utc>) -> Option<Duration> {
        let remaining = self.resets_at - now;
        (remaining > Duration::zero()).then_some(remaining)
    }
}

// ============================================================================
// Usage Snapshot
// ============================================================================

/// A snapshot of usage data across all quota windows.
///
/// - **session** = the short rolling window (5 hours)
/// - **weekly** = the 7-day rolling window
/// - **sonnet** = optional advisory sub-quota for the Sonnet tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    /// Session usage window.
    pub session: UsageWindow,
    /// Weekly usage window.
    pub weekly: UsageWindow,
    /// Optional sonnet sub-quota window.
    pub sonnet: Option<UsageWindow>,
    /// When this snapshot was produced (acquisition time, not wire data).
    pub last_updated: DateTime<Utc>,
}

impl UsageSnapshot {
    /// Status for the governing window: the worse of session and weekly.
    ///
    /// The sonnet window is advisory and never drives the status.
    pub fn primary_status(&self) -> UsageStatus {
        UsageStatus::classify(self.session.percentage().max(self.weekly.percentage()))
    }

    /// Returns true if this snapshot is older than `threshold`.
    ///
    /// Display freshness, distinct from the acquisition cache's TTL.
    pub fn is_stale(&self, threshold: Duration, now: DateTime<Utc>) -> bool {
        now - self.last_updated > threshold
    }
}

// ============================================================================
// Usage Status
// ============================================================================

/// Usage status level for visual indication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageStatus {
    /// 0-49% used.
    Safe,
    /// 50-79% used.
    Warning,
    /// 80-100% used.
    Critical,
}

impl UsageStatus {
    /// Classifies a percentage into a status level.
    pub fn classify(percentage: f64) -> Self {
        if percentage < 50.0 {
            UsageStatus::Safe
        } else if percentage < 80.0 {
            UsageStatus::Warning
        } else {
            UsageStatus::Critical
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            UsageStatus::Safe => "Safe",
            UsageStatus::Warning => "Warning",
            UsageStatus::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for UsageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn window(utilization: f64) -> UsageWindow {
        UsageWindow::new(utilization, Utc::now() + Duration::hours(1))
    }

    #[test]
    fn test_percentage_clamps() {
        assert_eq!(window(42.0).percentage(), 42.0);
        assert_eq!(window(-5.0).percentage(), 0.0);
        assert_eq!(window(150.0).percentage(), 100.0);
    }

    #[test]
    fn test_percentage_with_zero_limit() {
        let mut w = window(42.0);
        w.limit = 0.0;
        assert_eq!(w.percentage(), 0.0);
    }

    #[test]
    fn test_remaining_percent() {
        assert_eq!(window(75.0).remaining_percent(), 25.0);
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(UsageStatus::classify(0.0), UsageStatus::Safe);
        assert_eq!(UsageStatus::classify(49.9), UsageStatus::Safe);
        assert_eq!(UsageStatus::classify(50.0), UsageStatus::Warning);
        assert_eq!(UsageStatus::classify(79.9), UsageStatus::Warning);
        assert_eq!(UsageStatus::classify(80.0), UsageStatus::Critical);
        assert_eq!(UsageStatus::classify(100.0), UsageStatus::Critical);
    }

    #[test]
    fn test_primary_status_uses_worse_window() {
        let snapshot = UsageSnapshot {
            session: window(10.0),
            weekly: window(85.0),
            sonnet: None,
            last_updated: Utc::now(),
        };
        assert_eq!(snapshot.primary_status(), UsageStatus::Critical);
    }

    #[test]
    fn test_sonnet_does_not_drive_status() {
        let snapshot = UsageSnapshot {
            session: window(10.0),
            weekly: window(20.0),
            sonnet: Some(window(99.0)),
            last_updated: Utc::now(),
        };
        assert_eq!(snapshot.primary_status(), UsageStatus::Safe);
    }

    #[test]
    fn test_staleness() {
        let now = Utc::now();
        let snapshot = UsageSnapshot {
            session: window(10.0),
            weekly: window(20.0),
            sonnet: None,
            last_updated: now - Duration::minutes(10),
        };
        assert!(snapshot.is_stale(Duration::minutes(5), now));
        assert!(!snapshot.is_stale(Duration::minutes(15), now));
    }

    #[test]
    fn test_time_until_reset() {
        let now = Utc::now();
        let w = UsageWindow::new(50.0, now + Duration::hours(2));
        assert!(w.time_until_reset(now).is_some());

        let past = UsageWindow::new(50.0, now - Duration::hours(1));
        assert!(past.time_until_reset(now).is_none());
    }
}

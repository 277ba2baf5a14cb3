//! Notification hysteresis state.

use serde::{Deserialize, Serialize};

/// Tracks which notification thresholds have already fired.
///
/// A flag can only be set by an evaluation that observed the threshold
/// crossed from below, and is cleared only when a later evaluation observes
/// the percentage back under that same threshold. One instance exists per
/// installation, persisted through the settings store.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationState {
    /// Whether the warning notification has been sent for the current climb.
    pub warning_notified: bool,

    /// Whether the critical notification has been sent for the current climb.
    pub critical_notified: bool,

    /// Last observed session percentage, used to detect a reset to zero.
    pub last_percentage: f64,
}

impl NotificationState {
    /// Clears fired flags for thresholds the percentage has dropped under.
    ///
    /// Runs unconditionally before the crossing checks on every evaluation;
    /// this is what allows re-firing after a drop.
    pub fn rearm(&mut self, percentage: f64, warning_threshold: f64, critical_threshold: f64) {
        if percentage < warning_threshold {
            self.warning_notified = false;
        }
        if percentage < critical_threshold {
            self.critical_notified = false;
        }
    }

    /// Whether the session window just reset to zero.
    ///
    /// Uses the stored `last_percentage` from the prior evaluation; callers
    /// must check this before overwriting it with the current value.
    pub fn should_notify_reset(&self, percentage: f64) -> bool {
        self.last_percentage > 0.0 && percentage == 0.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rearm_clears_below_threshold() {
        let mut state = NotificationState {
            warning_notified: true,
            critical_notified: true,
            last_percentage: 95.0,
        };

        state.rearm(80.0, 75.0, 90.0);
        assert!(state.warning_notified);
        assert!(!state.critical_notified);

        state.rearm(50.0, 75.0, 90.0);
        assert!(!state.warning_notified);
        assert!(!state.critical_notified);
    }

    #[test]
    fn test_reset_detection() {
        let state = NotificationState {
            last_percentage: 50.0,
            ..Default::default()
        };
        assert!(state.should_notify_reset(0.0));
        assert!(!state.should_notify_reset(1.0));

        let idle = NotificationState::default();
        assert!(!idle.should_notify_reset(0.0));
    }

    #[test]
    fn test_serde_round_trip() {
        let state = NotificationState {
            warning_notified: true,
            critical_notified: false,
            last_percentage: 42.0,
        };
        let json = serde_json::to_string(&state).unwrap();
        let back: NotificationState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}

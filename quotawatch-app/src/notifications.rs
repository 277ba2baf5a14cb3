//! Usage threshold notifications.
//!
//! Evaluates the session window against the configured thresholds and emits
//! at most one alert per crossing. The hysteresis flags re-arm when the
//! percentage drops back under a threshold, so a renewed climb notifies
//! again without spamming every poll in between.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quotawatch_core::{AppSettings, UsageSnapshot};
use quotawatch_store::SettingsStore;
use tracing::{debug, info, warn};

// ============================================================================
// Alerts & Sink
// ============================================================================

/// Kind of usage alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Usage crossed the warning threshold.
    Warning,
    /// Usage crossed the critical threshold.
    Critical,
    /// The session window reset to zero.
    Reset,
}

/// A user-visible alert decided by the threshold engine.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageAlert {
    /// What happened.
    pub kind: AlertKind,
    /// Session percentage at evaluation time.
    pub percentage: f64,
    /// When the session window resets, where relevant.
    pub resets_at: Option<DateTime<Utc>>,
}

/// Delivers alerts to the user.
///
/// The engine only decides whether and what to notify; rendering and OS
/// delivery live behind this trait.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Whether the OS currently permits delivering notifications.
    async fn is_authorized(&self) -> bool;

    /// Delivers one alert. Failures are the sink's problem to log.
    async fn deliver(&self, alert: UsageAlert);
}

// ============================================================================
// Notification Service
// ============================================================================

/// Stateful threshold evaluator.
///
/// Hysteresis state is persisted through the settings store: loaded before
/// each evaluation, saved after any mutation. This engine is the only
/// writer of that state.
pub struct NotificationService {
    settings_store: Arc<SettingsStore>,
    sink: Arc<dyn NotificationSink>,
}

impl NotificationService {
    /// Wires the engine to its state store and sink.
    pub fn new(settings_store: Arc<SettingsStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            settings_store,
            sink,
        }
    }

    /// Evaluates thresholds against a freshly fetched snapshot.
    ///
    /// The session window is the governing value; weekly and sonnet windows
    /// do not drive notifications.
    pub async fn evaluate_thresholds(&self, snapshot: &UsageSnapshot, settings: &AppSettings) {
        if !settings.notifications_enabled {
            return;
        }
        if !self.sink.is_authorized().await {
            debug!("Notification permission missing, skipping evaluation");
            return;
        }

        let percentage = snapshot.session.percentage();
        let thresholds = &settings.thresholds;

        let mut state = self.settings_store.load_notification_state().await;
        let before = state;

        // Re-arm below-threshold flags before the crossing checks; this is
        // what allows re-firing after a drop.
        state.rearm(percentage, thresholds.warning, thresholds.critical);

        if !state.warning_notified && percentage >= thresholds.warning {
            info!(percentage, "Warning threshold crossed");
            self.sink
                .deliver(UsageAlert {
                    kind: AlertKind::Warning,
                    percentage,
                    resets_at: Some(snapshot.session.resets_at),
                })
                .await;
            state.warning_notified = true;
        }

        // Independent of the warning flag; both can fire in one evaluation
        // when usage jumps past both thresholds at once.
        if !state.critical_notified && percentage >= thresholds.critical {
            info!(percentage, "Critical threshold crossed");
            self.sink
                .deliver(UsageAlert {
                    kind: AlertKind::Critical,
                    percentage,
                    resets_at: Some(snapshot.session.resets_at),
                })
                .await;
            state.critical_notified = true;
        }

        // Reset detection reads the previous percentage before it is
        // overwritten below.
        if thresholds.notify_on_reset && state.should_notify_reset(percentage) {
            info!("Session window reset detected");
            self.sink
                .deliver(UsageAlert {
                    kind: AlertKind::Reset,
                    percentage,
                    resets_at: Some(snapshot.session.resets_at),
                })
                .await;
        }

        state.last_percentage = percentage;

        if state != before {
            if let Err(e) = self.settings_store.save_notification_state(state).await {
                warn!(error = %e, "Failed to persist notification state");
            }
        }
    }
}

// ============================================================================
// System Sink
// ============================================================================

/// Sink delivering alerts through the OS notification mechanism.
pub struct SystemNotificationSink;

impl SystemNotificationSink {
    fn render(alert: &UsageAlert) -> (String, String) {
        match alert.kind {
            AlertKind::Warning => (
                "Claude Usage Warning".to_string(),
                format!("You've used {:.0}% of your session quota.", alert.percentage),
            ),
            AlertKind::Critical => (
                "Claude Usage Critical!".to_string(),
                format!(
                    "You've used {:.0}% of your session quota. Consider slowing down.",
                    alert.percentage
                ),
            ),
            AlertKind::Reset => {
                let detail = alert
                    .resets_at
                    .map(|t| format!(" Next reset {}.", t.format("%H:%M UTC")))
                    .unwrap_or_default();
                (
                    "Claude Session Reset".to_string(),
                    format!("Your session quota is back to 0%.{detail}"),
                )
            }
        }
    }
}

#[async_trait]
impl NotificationSink for SystemNotificationSink {
    async fn is_authorized(&self) -> bool {
        true
    }

    async fn deliver(&self, alert: UsageAlert) {
        let (title, body) = Self::render(&alert);
        info!(title = %title, "Delivering notification");

        #[cfg(target_os = "macos")]
        {
            use std::process::Command;
            // Escape quotes to avoid AppleScript injection
            let escaped_body = body.replace('"', "\\\"").replace('\n', " ");
            let escaped_title = title.replace('"', "\\\"");
            let script = format!(
                "display notification \"{escaped_body}\" with title \"{escaped_title}\""
            );
            let _ = Command::new("osascript").args(["-e", &script]).spawn();
        }

        #[cfg(target_os = "linux")]
        {
            use std::process::Command;
            let _ = Command::new("notify-send").args([&title, &body]).spawn();
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux")))]
        {
            debug!(body = %body, "No system notifier on this platform");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

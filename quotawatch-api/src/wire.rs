//! Wire-format types for the usage-metering API.
//!
//! # Response Format
//!
//! ```json
//! {
//!   "five_hour": {"utilization": 25.0, "resets_at": "2025-01-01T12:00:00.000Z"},
//!   "seven_day": {"utilization": 45.0, "resets_at": "2025-01-05T00:00:00.000Z"},
//!   "seven_day_opus": {"utilization": 30.0, "resets_at": null}
//! }
//! ```
//!
//! Timestamps are RFC 3339 with fractional seconds. The sub-quota block is
//! optional and has appeared under both `seven_day_opus` and
//! `seven_day_sonnet`; both spellings are accepted.

use serde::Deserialize;

/// Response from the usage endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageApiResponse {
    /// 5-hour session window.
    pub five_hour: UsageLimitResponse,
    /// 7-day window (all models).
    pub seven_day: UsageLimitResponse,
    /// Optional model-tier sub-quota window.
    #[serde(default, alias = "seven_day_sonnet")]
    pub seven_day_opus: Option<UsageLimitResponse>,
}

/// Individual usage limit block.
#[derive(Debug, Clone, Deserialize)]
pub struct UsageLimitResponse {
    /// Utilization percentage (0-100).
    pub utilization: f64,
    /// When this window resets (RFC 3339), can be null.
    pub resets_at: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let json = r#"{
            "five_hour": {"utilization": 25.5, "resets_at": "2025-01-01T12:00:00.000Z"},
            "seven_day": {"utilization": 45.0, "resets_at": "2025-01-05T00:00:00.000Z"},
            "seven_day_opus": {"utilization": 30.0, "resets_at": null}
        }"#;

        let response: UsageApiResponse = serde_json::from_str(json).unwrap();
        assert!((response.five_hour.utilization - 25.5).abs() < f64::EPSILON);
        assert!((response.seven_day.utilization - 45.0).abs() < f64::EPSILON);

        let opus = response.seven_day_opus.unwrap();
        assert!((opus.utilization - 30.0).abs() < f64::EPSILON);
        assert!(opus.resets_at.is_none());
    }

    #[test]
    fn test_sub_quota_block_is_optional() {
        let json = r#"{
            "five_hour": {"utilization": 10.0, "resets_at": "2025-01-01T12:00:00.000Z"},
            "seven_day": {"utilization": 20.0, "resets_at": "2025-01-05T00:00:00.000Z"}
        }"#;

        let response: UsageApiResponse = serde_json::from_str(json).unwrap();
        assert!(response.seven_day_opus.is_none());
    }

    #[test]
    fn test_sonnet_alias_accepted() {
        let json = r#"{
            "five_hour": {"utilization": 10.0, "resets_at": "2025-01-01T12:00:00.000Z"},
            "seven_day": {"utilization": 20.0, "resets_at": "2025-01-05T00:00:00.000Z"},
            "seven_day_sonnet": {"utilization": 5.0, "resets_at": "2025-01-04T00:00:00.000Z"}
        }"#;

        let response: UsageApiResponse = serde_json::from_str(json).unwrap();
        assert!(response.seven_day_opus.is_some());
    }
}

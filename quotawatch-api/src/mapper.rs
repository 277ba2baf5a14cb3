//! Pure conversion from wire-format payloads into the domain model.

use chrono::{DateTime, Duration, Utc};
use quotawatch_core::{MappingError, Organization, UsageSnapshot, UsageWindow};
use tracing::debug;

use crate::wire::{UsageApiResponse, UsageLimitResponse};

/// Maps a usage response into a [`UsageSnapshot`].
///
/// The session and weekly reset timestamps are load-bearing: if either is
/// absent or unparseable the whole response is rejected rather than
/// synthesizing a fake reset date. The optional sub-quota window is
/// advisory, so a missing reset there defaults to `now + 7 days`.
///
/// `last_updated` is stamped with `now` (acquisition time), never taken from
/// the payload.
///
/// # Errors
///
/// Returns [`MappingError::MissingOrInvalidField`] naming the offending
/// field.
pub fn map_usage(
    response: &UsageApiResponse,
    now: DateTime<Utc>,
) -> Result<UsageSnapshot, MappingError> {
    let session_reset = parse_reset(&response.five_hour, "five_hour.resets_at")?;
    let weekly_reset = parse_reset(&response.seven_day, "seven_day.resets_at")?;

    let sonnet = response.seven_day_opus.as_ref().map(|block| {
        let reset = try_parse_reset(block).unwrap_or_else(|| now + Duration::days(7));
        UsageWindow::new(block.utilization, reset)
    });

    debug!(
        session = response.five_hour.utilization,
        weekly = response.seven_day.utilization,
        has_sonnet = sonnet.is_some(),
        "Mapped usage response"
    );

    Ok(UsageSnapshot {
        session: UsageWindow::new(response.five_hour.utilization, session_reset),
        weekly: UsageWindow::new(response.seven_day.utilization, weekly_reset),
        sonnet,
        last_updated: now,
    })
}

/// Parses the organization-list endpoint body.
///
/// An empty list is valid output; callers decide whether that is an error.
///
/// # Errors
///
/// Returns [`MappingError::Json`] if the body is not an organization array.
pub fn parse_organizations(body: &[u8]) -> Result<Vec<Organization>, MappingError> {
    Ok(serde_json::from_slice(body)?)
}

fn parse_reset(
    block: &UsageLimitResponse,
    field: &'static str,
) -> Result<DateTime<Utc>, MappingError> {
    try_parse_reset(block).ok_or(MappingError::MissingOrInvalidField(field))
}

fn try_parse_reset(block: &UsageLimitResponse) -> Option<DateTime<Utc>> {
    block
        .resets_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SESSION_RESET: &str = "2025-01-01T00:00:00.000Z";
    const WEEKLY_RESET: &str = "2025-01-08T00:00:00.000Z";

    fn block(utilization: f64, resets_at: Option<&str>) -> UsageLimitResponse {
        UsageLimitResponse {
            utilization,
            resets_at: resets_at.map(str::to_string),
        }
    }

    fn response(
        session_reset: Option<&str>,
        weekly_reset: Option<&str>,
        opus: Option<UsageLimitResponse>,
    ) -> UsageApiResponse {
        UsageApiResponse {
            five_hour: block(42.0, session_reset),
            seven_day: block(10.0, weekly_reset),
            seven_day_opus: opus,
        }
    }

    #[test]
    fn test_maps_full_response() {
        let now = Utc::now();
        let snapshot = map_usage(
            &response(Some(SESSION_RESET), Some(WEEKLY_RESET), None),
            now,
        )
        .unwrap();

        assert_eq!(snapshot.session.percentage(), 42.0);
        assert_eq!(snapshot.weekly.percentage(), 10.0);
        assert_eq!(
            snapshot.session.resets_at,
            DateTime::parse_from_rfc3339(SESSION_RESET).unwrap()
        );
        assert_eq!(snapshot.last_updated, now);
        assert!(snapshot.sonnet.is_none());
    }

    #[test]
    fn test_missing_session_reset_fails() {
        let err = map_usage(&response(None, Some(WEEKLY_RESET), None), Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            MappingError::MissingOrInvalidField("five_hour.resets_at")
        ));
    }

    #[test]
    fn test_unparseable_weekly_reset_fails() {
        let err = map_usage(
            &response(Some(SESSION_RESET), Some("next tuesday"), None),
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MappingError::MissingOrInvalidField("seven_day.resets_at")
        ));
    }

    #[test]
    fn test_sonnet_reset_defaults_to_seven_days() {
        let now = Utc::now();
        let snapshot = map_usage(
            &response(
                Some(SESSION_RESET),
                Some(WEEKLY_RESET),
                Some(block(5.0, None)),
            ),
            now,
        )
        .unwrap();

        let sonnet = snapshot.sonnet.unwrap();
        assert_eq!(sonnet.percentage(), 5.0);
        assert_eq!(sonnet.resets_at, now + Duration::days(7));
    }

    #[test]
    fn test_sonnet_reset_parsed_when_present() {
        let snapshot = map_usage(
            &response(
                Some(SESSION_RESET),
                Some(WEEKLY_RESET),
                Some(block(5.0, Some("2025-01-04T00:00:00.000Z"))),
            ),
            Utc::now(),
        )
        .unwrap();

        let sonnet = snapshot.sonnet.unwrap();
        assert_eq!(
            sonnet.resets_at,
            DateTime::parse_from_rfc3339("2025-01-04T00:00:00.000Z").unwrap()
        );
    }

    #[test]
    fn test_parse_organizations() {
        let body = br#"[
            {"id": 1, "uuid": "e4c9b3e0-7c4b-4c4b-a1e0-111111111111", "name": "Acme"},
            {"id": 2, "uuid": "e4c9b3e0-7c4b-4c4b-a1e0-222222222222", "name": "Beta"}
        ]"#;

        let orgs = parse_organizations(body).unwrap();
        assert_eq!(orgs.len(), 2);
        assert_eq!(orgs[0].name, "Acme");
    }

    #[test]
    fn test_parse_organizations_empty_is_valid() {
        let orgs = parse_organizations(b"[]").unwrap();
        assert!(orgs.is_empty());
    }

    #[test]
    fn test_parse_organizations_garbage_fails() {
        assert!(parse_organizations(b"not json").is_err());
    }
}

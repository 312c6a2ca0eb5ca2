//! Timestamp parsing for event boundaries and commit times.
//!
//! Everything downstream works in UTC. Inputs should carry an explicit
//! offset (git's `%aI` always does); a naive timestamp is assumed UTC
//! rather than rejected, matching how roster files are written in practice.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::ScanError;

/// Parse an ISO-8601 timestamp into a UTC instant.
///
/// Accepts RFC-3339 with any offset (including `Z`), and falls back to a
/// naive `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS` form interpreted
/// as UTC.
///
/// # Errors
///
/// Returns [`ScanError::Time`] if the value matches none of the accepted
/// forms. An unparsable event boundary is fatal for that repository's run.
///
/// # Examples
///
/// ```
/// use hackscan_core::time::parse_timestamp;
///
/// let a = parse_timestamp("2025-03-01T09:00:00Z").unwrap();
/// let b = parse_timestamp("2025-03-01T10:00:00+01:00").unwrap();
/// assert_eq!(a, b);
///
/// assert!(parse_timestamp("next tuesday").is_err());
/// ```
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ScanError> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(ScanError::Time(format!(
        "not an ISO-8601 timestamp: '{value}'"
    )))
}

/// Elapsed minutes from `from` to `to` as a float.
///
/// Negative when `to` precedes `from`; callers preserve that, they do not
/// clamp it.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}

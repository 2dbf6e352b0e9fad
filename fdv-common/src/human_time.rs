//! Human-readable relative time
//!
//! Formats "last updated" stamps for saved pipeline responses.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Relative time thresholds (seconds)
const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Format the time elapsed between `then` and `now`
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use fdv_common::human_time::time_ago;
///
/// let now = Utc::now();
/// assert_eq!(time_ago(None, now), "Never");
/// assert_eq!(time_ago(Some(now - Duration::seconds(30)), now), "Just now");
/// assert_eq!(time_ago(Some(now - Duration::minutes(1)), now), "1 minute ago");
/// assert_eq!(time_ago(Some(now - Duration::hours(5)), now), "5 hours ago");
/// assert_eq!(time_ago(Some(now - Duration::days(2)), now), "2 days ago");
/// ```
pub fn time_ago(then: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(then) = then else {
        return "Never".to_string();
    };

    // Future stamps (clock skew) read as "Just now"
    let secs = (now - then).num_seconds();
    if secs < MINUTE {
        "Just now".to_string()
    } else if secs < HOUR {
        plural(secs / MINUTE, "minute")
    } else if secs < DAY {
        plural(secs / HOUR, "hour")
    } else {
        plural(secs / DAY, "day")
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {} ago", count, unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

/// Parse a stored timestamp
///
/// Accepts RFC 3339 (`2025-06-01T12:00:00Z`) and SQLite's
/// `CURRENT_TIMESTAMP` form (`2025-06-01 12:00:00`, taken as UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

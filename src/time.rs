// src/time.rs

//! Whole-day arithmetic over UTC instants.
//!
//! Both the scheduler and the alert evaluator measure distances as
//! `ceil(delta / 1 day)`. Working in milliseconds keeps sub-day offsets
//! (e.g. an end date at noon evaluated at midnight) rounding the same way on
//! both sides of zero.

use chrono::{DateTime, Duration, NaiveDate, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// `ceil((to - from) / 1 day)`, negative when `to` precedes `from`.
pub fn ceil_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let millis = (to - from).num_milliseconds();
    ceil_div(millis, MILLIS_PER_DAY)
}

/// Shift `at` by a whole number of days; `None` when the result falls
/// outside the representable date range.
pub fn add_days(at: DateTime<Utc>, days: i64) -> Option<DateTime<Utc>> {
    Duration::try_days(days).and_then(|d| at.checked_add_signed(d))
}

/// Integer ceiling division for a positive divisor.
pub fn ceil_div(numerator: i64, denominator: i64) -> i64 {
    debug_assert!(denominator > 0);
    -((-numerator).div_euclid(denominator))
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{s}': {e} (expected YYYY-MM-DD or RFC 3339)"))?;
    Ok(midnight_utc(date))
}

/// Midnight UTC at the start of `date`.
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

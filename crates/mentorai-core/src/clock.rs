//! Wall-clock arithmetic shared by the planner and the local stores.
//!
//! Times of day are handled as minutes since midnight. Two parsers exist:
//! a lenient one used while planning (anything unparseable becomes
//! midnight, with a warning) and a strict one used where stored data is
//! validated.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::ValidationError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse an `HH:MM` string into minutes since midnight, degrading to `0`.
///
/// Hours above 23 are accepted as-is so that the arithmetic stays
/// monotonic; only formatting wraps them. Values too large for a minute
/// count are unparseable.
pub fn parse_minutes_lenient(time: &str) -> u32 {
    match split_hh_mm(time).and_then(|(h, m)| h.checked_mul(60)?.checked_add(m)) {
        Some(minutes) => minutes,
        None => {
            tracing::warn!(time, "unparseable time of day, treating as 00:00");
            0
        }
    }
}

/// Parse a strict `HH:MM` 24-hour string (two digits each, 00:00-23:59).
pub fn parse_minutes_strict(time: &str) -> Result<u32, ValidationError> {
    let bytes = time.as_bytes();
    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
    if !well_formed {
        return Err(ValidationError::InvalidTime(time.to_string()));
    }
    match split_hh_mm(time) {
        Some((h, m)) if h < 24 && m < 60 => Ok(h * 60 + m),
        _ => Err(ValidationError::InvalidTime(time.to_string())),
    }
}

/// Whether `time` is a strict `HH:MM` string.
pub fn is_valid_time(time: &str) -> bool {
    parse_minutes_strict(time).is_ok()
}

fn split_hh_mm(time: &str) -> Option<(u32, u32)> {
    let mut parts = time.split(':');
    let h = parts.next()?.trim().parse::<u32>().ok()?;
    let m = parts.next()?.trim().parse::<u32>().ok()?;
    Some((h, m))
}

/// Format minutes since midnight as `HH:MM`, wrapping the hour modulo 24.
pub fn format_minutes(minutes: u32) -> String {
    format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60)
}

/// Minutes since midnight of a wall-clock instant.
pub fn minute_of_day(now: NaiveDateTime) -> u32 {
    now.hour() * 60 + now.minute()
}

/// Canonical `YYYY-MM-DD` key for a calendar day.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a `YYYY-MM-DD` day key.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), "%Y-%m-%d").ok()
}

/// Parse a deadline string.
///
/// Accepts a bare date (`2024-05-01`, read as that day's midnight), a naive
/// timestamp (`2024-05-01T17:00:00`), or an RFC 3339 timestamp, whose wall
/// clock as written is used.
pub fn parse_deadline(deadline: &str) -> Option<NaiveDateTime> {
    let deadline = deadline.trim();
    if deadline.is_empty() {
        return None;
    }
    if let Some(date) = parse_day_key(deadline) {
        return Some(date.and_time(NaiveTime::MIN));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(deadline) {
        return Some(ts.naive_local());
    }
    NaiveDateTime::parse_from_str(deadline, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(deadline, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Whole days from `now` until `deadline`, truncated toward zero.
///
/// Negative for overdue deadlines; `None` when the deadline is absent or
/// cannot be parsed.
pub fn days_until(deadline: Option<&str>, now: NaiveDateTime) -> Option<i64> {
    let due = parse_deadline(deadline?)?;
    Some((due - now).num_days())
}

/// `now` shifted by a number of minutes.
pub fn add_minutes(now: NaiveDateTime, minutes: u32) -> NaiveDateTime {
    now + Duration::minutes(i64::from(minutes))
}

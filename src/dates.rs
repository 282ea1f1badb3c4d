// ABOUTME: Centralized ISO calendar-date utilities for range resolution
// ABOUTME: All "today" values are passed in so tests can inject fixed clocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Date-range utilities.
//!
//! Everything here is pure: the current date and time enter only as
//! arguments, never from ambient clocks, so range and callback logic is
//! testable with fixed inputs. The handlers obtain real values from
//! [`today_local`] and [`now_millis`].

use chrono::{Local, NaiveDate, Utc};

/// Range lengths the API accepts; anything else clamps to the default
pub const ALLOWED_RANGE_DAYS: [u32; 3] = [7, 30, 90];

/// Fallback range length for unrecognized `days` values
pub const DEFAULT_RANGE_DAYS: u32 = 30;

/// Today's calendar date in server-local time
#[must_use]
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// Current wall-clock time as epoch milliseconds
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Clamp a raw `days` query value to one of the allowed range lengths.
/// Absent, non-numeric and unrecognized values all resolve to 30.
#[must_use]
pub fn clamp_days(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| ALLOWED_RANGE_DAYS.contains(n))
        .unwrap_or(DEFAULT_RANGE_DAYS)
}

/// Parse a strict `YYYY-MM-DD` string
#[must_use]
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Resolve the requested range end: a valid `YYYY-MM-DD` value wins,
/// anything else falls back to `today`.
#[must_use]
pub fn resolve_end(raw: Option<&str>, today: NaiveDate) -> NaiveDate {
    raw.and_then(parse_iso_date).unwrap_or(today)
}

/// Shift a date by a signed number of days
#[must_use]
pub fn add_days(date: NaiveDate, delta: i64) -> NaiveDate {
    date + chrono::Duration::days(delta)
}

/// Inclusive range ending at `end` spanning `days` calendar days
#[must_use]
pub fn range_from_end(days: u32, end: NaiveDate) -> (NaiveDate, NaiveDate) {
    (add_days(end, -i64::from(days) + 1), end)
}

/// Deterministic inclusive day-by-day enumeration from `start` to `end`.
/// Empty when `start > end`.
#[must_use]
pub fn enumerate_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut current = start;
    while current <= end {
        out.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    out
}

/// Format a date as `YYYY-MM-DD`
#[must_use]
pub fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

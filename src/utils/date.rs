//! Date/time normalization.
//!
//! Client dates arrive as `YYYY-MM-DD` or the deprecated `YYYY.MM.DD`; the
//! ledger stores them as fixed-width `YYYYMMDD` and times as `HHMM`, so that
//! `date + time` compares correctly as a plain string.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Months, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})([-.])(\d{2})([-.])(\d{2})$").expect("static date pattern")
});
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2})$").expect("static time pattern"));
static COMPACT_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}$").expect("static compact date pattern"));
static MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-?(\d{2})$").expect("static month pattern"));

/// `YYYY-MM-DD` | `YYYY.MM.DD` → `YYYYMMDD`.
///
/// Both separators must be the same character, and the result must be a real
/// calendar day.
pub fn normalize_date(raw: &str) -> AppResult<String> {
    let caps = DATE_RE
        .captures(raw.trim())
        .ok_or_else(|| AppError::InvalidDate(raw.to_string()))?;

    if caps[2] != caps[4] {
        return Err(AppError::InvalidDate(raw.to_string()));
    }

    let compact = format!("{}{}{}", &caps[1], &caps[3], &caps[5]);
    parse_compact_date(&compact).map_err(|_| AppError::InvalidDate(raw.to_string()))?;
    Ok(compact)
}

/// `HH:MM` → `HHMM`.
pub fn normalize_time(raw: &str) -> AppResult<String> {
    let caps = TIME_RE
        .captures(raw.trim())
        .ok_or_else(|| AppError::InvalidTime(raw.to_string()))?;

    let hour: u32 = caps[1].parse().map_err(|_| AppError::InvalidTime(raw.to_string()))?;
    let minute: u32 = caps[2].parse().map_err(|_| AppError::InvalidTime(raw.to_string()))?;
    if hour > 23 || minute > 59 {
        return Err(AppError::InvalidTime(raw.to_string()));
    }

    Ok(format!("{}{}", &caps[1], &caps[2]))
}

/// Parse a stored/compact `YYYYMMDD` date. The sentinel `00000000` is not a
/// date and fails here.
pub fn parse_compact_date(raw: &str) -> AppResult<NaiveDate> {
    if !COMPACT_DATE_RE.is_match(raw) {
        return Err(AppError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d").map_err(|_| AppError::InvalidDate(raw.to_string()))
}

/// Validate a client-assigned linked date and return it unchanged.
pub fn linked_date(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    parse_compact_date(trimmed)?;
    Ok(trimmed.to_string())
}

/// Parse the fixed-width `YYYYMMDDHHMM` key back into a typed moment.
pub fn parse_moment_key(key: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(key, "%Y%m%d%H%M").ok()
}

/// Typed moment → `YYYYMMDDHHMM`.
pub fn moment_key(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%d%H%M").to_string()
}

/// `YYYYMM` of the month to display; the current month when unspecified.
/// Also accepts `YYYY-MM`.
pub fn month_prefix(raw: Option<&str>, today: NaiveDate) -> AppResult<String> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(today.format("%Y%m").to_string()),
        Some(r) => r,
    };

    let caps = MONTH_RE
        .captures(raw)
        .ok_or_else(|| AppError::InvalidDate(raw.to_string()))?;
    let prefix = format!("{}{}", &caps[1], &caps[2]);
    first_of_month(&prefix)?;
    Ok(prefix)
}

/// First day of a `YYYYMM` month.
pub fn first_of_month(prefix: &str) -> AppResult<NaiveDate> {
    parse_compact_date(&format!("{prefix}01"))
}

/// Last day of the month before `first`.
pub fn day_before(first: NaiveDate) -> AppResult<NaiveDate> {
    first
        .pred_opt()
        .ok_or_else(|| AppError::InvalidDate(first.to_string()))
}

/// Same day-of-month one month later (`first` is always day 1 here).
pub fn next_month(first: NaiveDate) -> AppResult<NaiveDate> {
    first
        .checked_add_months(Months::new(1))
        .ok_or_else(|| AppError::InvalidDate(first.to_string()))
}

pub fn compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Server-side write timestamp, legacy store format `YYYY/MM/DD hh:mm:ss.SSS`.
pub fn server_timestamp(now: NaiveDateTime) -> String {
    now.format("%Y/%m/%d %H:%M:%S%.3f").to_string()
}

/// `YYYY-MM` label for a `YYYYMM` prefix, for human output.
pub fn month_label(prefix: &str) -> String {
    match first_of_month(prefix) {
        Ok(d) => format!("{:04}-{:02}", d.year(), d.month()),
        Err(_) => prefix.to_string(),
    }
}

//! # Query Window Conversion
//!
//! The dashboard speaks in local calendar dates; the scheduler database stores
//! UTC instants. A local date maps onto the closed UTC interval from local
//! midnight to local `23:59:59.999999`, which the run queries use with
//! `BETWEEN`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::Serialize;

use crate::error::{MonitorError, MonitorResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// UTC bounds of one local calendar day (both inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UtcWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Convert a local `YYYY-MM-DD` date into its UTC window.
pub fn to_utc_window(local_date: &str, offset: FixedOffset) -> MonitorResult<UtcWindow> {
    let date = NaiveDate::parse_from_str(local_date.trim(), DATE_FORMAT).map_err(|e| {
        MonitorError::invalid_input(format!(
            "invalid date format '{local_date}', expected YYYY-MM-DD: {e}"
        ))
    })?;

    let end_of_day = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)
        .ok_or_else(|| MonitorError::invalid_input("invalid end-of-day time"))?;

    let start = localize(offset, date.and_time(NaiveTime::MIN))?;
    let end = localize(offset, date.and_time(end_of_day))?;

    Ok(UtcWindow { start, end })
}

fn localize(offset: FixedOffset, naive: chrono::NaiveDateTime) -> MonitorResult<DateTime<Utc>> {
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| MonitorError::invalid_input(format!("ambiguous local time {naive}")))
}

/// Render a UTC instant in the local zone, e.g. `2024-03-01T08:30:00+08:00`.
///
/// Fractional seconds are omitted when zero and otherwise always written
/// with six digits (`.123000`). `None` stays `None`.
pub fn to_local_string(instant: Option<DateTime<Utc>>, offset: FixedOffset) -> Option<String> {
    instant.map(|utc| {
        let precision = if utc.timestamp_subsec_micros() == 0 {
            SecondsFormat::Secs
        } else {
            SecondsFormat::Micros
        };
        utc.with_timezone(&offset).to_rfc3339_opts(precision, false)
    })
}

/// Parse a configured UTC offset: `+08:00`, `-0530`, `Z` or `UTC`.
pub fn parse_utc_offset(value: &str) -> MonitorResult<FixedOffset> {
    let value = value.trim();
    let invalid = || MonitorError::Configuration(format!("invalid UTC offset '{value}'"));

    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match value.chars().next() {
        Some('+') => (1, &value[1..]),
        Some('-') => (-1, &value[1..]),
        _ => return Err(invalid()),
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

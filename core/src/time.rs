use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::model::metrics::RangeSelector;

/// Parses a stored timestamp string.
///
/// Accepts RFC 3339 (what the completion form writes), `YYYY-MM-DD HH:MM:SS`
/// and bare `YYYY-MM-DD` (midnight). Naive values are taken as UTC.
/// Anything else is treated as missing.
pub fn parse_timestamp(input: Option<&str>) -> Option<DateTime<Utc>> {
    let input = input?.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
    }

    log::debug!("ignoring unparsable timestamp '{}'", input);
    None
}

pub fn to_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Elapsed hours from `start` to `end`, fractional, negative if reversed.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / 3_600_000.0
}

pub fn window_start(now: DateTime<Utc>, range: RangeSelector) -> DateTime<Utc> {
    now - range.window()
}

/// `HH:MM` wall-clock time used in notification text.
pub fn clock_time(dt: DateTime<Utc>) -> String {
    dt.format("%H:%M").to_string()
}

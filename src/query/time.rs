//! Timestamp parsing for date-range filters.
//!
//! Query bounds and record fields arrive in a handful of shapes: bare dates
//! (`2025-04-15`), local date-times with optional fractions
//! (`2025-04-15T08:51:39.244319`) and RFC 3339 stamps (`2023-01-15T08:30:00Z`).
//! Everything is compared as a naive date-time; offset-carrying values are
//! converted to UTC first.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a timestamp in any of the accepted shapes.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.naive_utc());
    }

    for format in DATE_TIME_FORMATS {
        if let Ok(stamp) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(stamp);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Last representable millisecond of the calendar day containing `stamp`.
pub fn end_of_day(stamp: NaiveDateTime) -> NaiveDateTime {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    stamp.date().and_time(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").unwrap()
    }

    #[test]
    fn test_parses_bare_date_as_midnight() {
        assert_eq!(parse_timestamp("2025-04-15"), Some(at("2025-04-15T00:00:00.0")));
    }

    #[test]
    fn test_parses_fractional_local_time() {
        assert_eq!(
            parse_timestamp("2025-04-15T08:51:39.244319"),
            Some(at("2025-04-15T08:51:39.244319"))
        );
    }

    #[test]
    fn test_parses_rfc3339_as_utc() {
        assert_eq!(
            parse_timestamp("2023-01-15T10:30:00+02:00"),
            Some(at("2023-01-15T08:30:00.0"))
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("   "), None);
    }

    #[test]
    fn test_end_of_day() {
        assert_eq!(
            end_of_day(at("2025-04-15T08:00:00.0")),
            at("2025-04-15T23:59:59.999")
        );
    }
}

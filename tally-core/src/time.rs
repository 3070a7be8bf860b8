//! Date helpers: calendar validation and UTC-midnight timestamps.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Midnight UTC for a calendar date.
pub fn utc_midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

/// Build a UTC-midnight timestamp from loose numeric parts.
///
/// Two-digit years are promoted to 2000+. Returns `None` for anything that is
/// not a real calendar date (`31/02/2026`, month 13, ...).
pub fn ymd_to_utc(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    let year = promote_year(year);
    NaiveDate::from_ymd_opt(year, month, day).map(utc_midnight)
}

/// `26` -> `2026`; four-digit years pass through.
pub fn promote_year(year: i32) -> i32 {
    if (0..100).contains(&year) {
        2000 + year
    } else {
        year
    }
}

/// Month number from an English month name or its three-letter prefix.
pub fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.trim().trim_end_matches('.').to_lowercase();
    let prefix = lower.get(..3)?;

    let month = match prefix {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Helper: format a UTC time into RFC3339 with a `Z` suffix, matching serde output.
pub fn to_rfc3339_utc(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_digit_year_promoted() {
        let dt = ymd_to_utc(26, 1, 5).unwrap();
        assert_eq!(to_rfc3339_utc(dt), "2026-01-05T00:00:00Z");
    }

    #[test]
    fn test_invalid_calendar_rejected() {
        assert!(ymd_to_utc(2026, 2, 31).is_none());
        assert!(ymd_to_utc(2026, 13, 1).is_none());
        assert!(ymd_to_utc(2026, 0, 1).is_none());
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_from_name("Jan"), Some(1));
        assert_eq!(month_from_name("september"), Some(9));
        assert_eq!(month_from_name("Dec."), Some(12));
        assert_eq!(month_from_name("Ju"), None);
        assert_eq!(month_from_name("Foo"), None);
    }
}

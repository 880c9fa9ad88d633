#![allow(dead_code)]
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use regex::Regex;

pub mod circuit_breaker;
pub mod logging;
pub mod retry;

/// Parse a timings-API clock label into a time of day.
///
/// The API reports labels like "05:12" or "05:12 (EET)"; the trailing zone
/// abbreviation is informational and dropped here.
pub fn parse_clock_label(label: &str) -> Option<NaiveTime> {
    let pattern = Regex::new(r"^\s*(\d{1,2}):(\d{2})").ok()?;
    let captures = pattern.captures(label)?;

    let hour: u32 = captures.get(1)?.as_str().parse().ok()?;
    let minute: u32 = captures.get(2)?.as_str().parse().ok()?;

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Resolve a local wall-clock time on a date to UTC.
///
/// DST fold ambiguity picks the earlier instant; a nonexistent local time
/// (spring-forward gap) resolves to nothing.
pub fn local_to_utc(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&date.and_time(time)) {
        chrono::LocalResult::Single(zoned) => Some(zoned.with_timezone(&Utc)),
        chrono::LocalResult::Ambiguous(earlier, _) => {
            log::warn!(
                "Ambiguous local time {} {} in {}, using earlier instant",
                date,
                time,
                tz
            );
            Some(earlier.with_timezone(&Utc))
        }
        chrono::LocalResult::None => {
            log::warn!("Nonexistent local time {} {} in {}", date, time, tz);
            None
        }
    }
}

/// Today's calendar date in the configured location's timezone.
pub fn local_today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Jummah is observed at dhuhr on Friday.
pub fn is_jummah_day(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Fri
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock_label_plain() {
        assert_eq!(
            parse_clock_label("05:12"),
            NaiveTime::from_hms_opt(5, 12, 0)
        );
    }

    #[test]
    fn test_parse_clock_label_with_zone_suffix() {
        assert_eq!(
            parse_clock_label("19:43 (EET)"),
            NaiveTime::from_hms_opt(19, 43, 0)
        );
    }

    #[test]
    fn test_parse_clock_label_invalid() {
        assert_eq!(parse_clock_label("soon"), None);
        assert_eq!(parse_clock_label("25:99"), None);
        assert_eq!(parse_clock_label(""), None);
    }

    #[test]
    fn test_local_to_utc_plain_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let time = NaiveTime::from_hms_opt(5, 0, 0).unwrap();

        // Cairo is UTC+2 in January
        let utc = local_to_utc(date, time, chrono_tz::Africa::Cairo).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 1, 15, 3, 0, 0).unwrap());
    }

    #[test]
    fn test_is_jummah_day() {
        // 2024-01-05 was a Friday
        assert!(is_jummah_day(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()));
        assert!(!is_jummah_day(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()));
    }
}

//! Date arithmetic used by the calendar grid and by appointment queries
//!
//! These are pure functions over `chrono` naive dates: appointments carry a wall-clock date-time with no timezone.

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, Weekday};

/// The format used to persist appointment dates
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Formats that are accepted when reading a date-time, in addition to RFC 3339
const ACCEPTED_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Something that falls on a calendar day
pub trait CalendarDay {
    fn day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn day(&self) -> NaiveDate { *self }
}

impl CalendarDay for NaiveDateTime {
    fn day(&self) -> NaiveDate { self.date() }
}

impl<T: CalendarDay> CalendarDay for &T {
    fn day(&self) -> NaiveDate { (*self).day() }
}

/// Whether two values share the same calendar date, regardless of their time component
pub fn is_same_day<A: CalendarDay, B: CalendarDay>(a: A, b: B) -> bool {
    a.day() == b.day()
}

/// The first day of the month `date` is in
pub fn start_of_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

/// The last day of the month `date` is in
pub fn end_of_month(date: NaiveDate) -> Option<NaiveDate> {
    (28..=31).rev().find_map(|day| date.with_day(day))
}

/// The first day of the week `date` is in, weeks starting on `week_start`.
///
/// Returns `None` if this day is before the earliest supported date.
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> Option<NaiveDate> {
    let offset = (7 + date.weekday().num_days_from_sunday() - week_start.num_days_from_sunday()) % 7;
    date.checked_sub_signed(Duration::days(i64::from(offset)))
}

/// The last day of the week `date` is in, weeks starting on `week_start`.
///
/// Returns `None` if this day is after the latest supported date.
pub fn end_of_week(date: NaiveDate, week_start: Weekday) -> Option<NaiveDate> {
    let offset = (7 + week_start.num_days_from_sunday() + 6 - date.weekday().num_days_from_sunday()) % 7;
    date.checked_add_signed(Duration::days(i64::from(offset)))
}

/// The day after `date`
pub fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}

/// Shift `date` by a number of whole months (possibly negative).
///
/// The day of month is clamped to the length of the target month (e.g. Jan 31 + 1 month is Feb 28 or 29).
/// Returns `None` if the result is out of the supported date range.
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let amount = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(amount)
    } else {
        date.checked_sub_months(amount)
    }
}

/// Every day from `start` to `end`, both included
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |day| *day <= end)
}

/// Format a date-time the way it is persisted
pub fn format_date_time(date: &NaiveDateTime) -> String {
    date.format(DATE_TIME_FORMAT).to_string()
}

/// Parse a persisted date-time.
///
/// RFC 3339 strings (such as the UTC ones written by the browser version) are converted to local time.
/// A bare `YYYY-MM-DD` date means midnight.
pub fn parse_date_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for format in ACCEPTED_DATE_TIME_FORMATS.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_boundaries() {
        assert_eq!(start_of_month(ymd(2024, 5, 17)), Some(ymd(2024, 5, 1)));
        assert_eq!(end_of_month(ymd(2024, 5, 17)), Some(ymd(2024, 5, 31)));
        assert_eq!(end_of_month(ymd(2024, 2, 1)), Some(ymd(2024, 2, 29)));
        assert_eq!(end_of_month(ymd(2023, 2, 28)), Some(ymd(2023, 2, 28)));
        assert_eq!(end_of_month(ymd(2023, 12, 31)), Some(ymd(2023, 12, 31)));
        assert_eq!(end_of_month(NaiveDate::MAX), Some(NaiveDate::MAX));
    }

    #[test]
    fn test_week_boundaries() {
        // 2024-05-01 is a Wednesday
        assert_eq!(start_of_week(ymd(2024, 5, 1), Weekday::Sun), Some(ymd(2024, 4, 28)));
        assert_eq!(end_of_week(ymd(2024, 5, 1), Weekday::Sun), Some(ymd(2024, 5, 4)));
        assert_eq!(start_of_week(ymd(2024, 5, 1), Weekday::Mon), Some(ymd(2024, 4, 29)));
        assert_eq!(end_of_week(ymd(2024, 5, 1), Weekday::Mon), Some(ymd(2024, 5, 5)));
        // A day that already is the week start
        assert_eq!(start_of_week(ymd(2024, 4, 28), Weekday::Sun), Some(ymd(2024, 4, 28)));
        assert_eq!(start_of_week(ymd(2024, 4, 27), Weekday::Sun), Some(ymd(2024, 4, 21)));
        assert_eq!(end_of_week(ymd(2024, 5, 4), Weekday::Sun), Some(ymd(2024, 5, 4)));
    }

    #[test]
    fn test_week_boundaries_at_the_supported_range_limits() {
        let min = NaiveDate::MIN;
        let max = NaiveDate::MAX;
        assert_eq!(start_of_week(min, min.weekday()), Some(min));
        assert_eq!(start_of_week(min, min.weekday().succ()), None);
        assert_eq!(end_of_week(max, max.weekday().succ()), Some(max));
        assert_eq!(end_of_week(max, max.weekday()), None);
        assert_eq!(next_day(max), None);
    }

    #[test]
    fn test_add_months() {
        assert_eq!(add_months(ymd(2024, 5, 1), 1), Some(ymd(2024, 6, 1)));
        assert_eq!(add_months(ymd(2024, 1, 1), -1), Some(ymd(2023, 12, 1)));
        assert_eq!(add_months(ymd(2024, 1, 31), 1), Some(ymd(2024, 2, 29)));
        assert_eq!(add_months(ymd(2024, 5, 1), 0), Some(ymd(2024, 5, 1)));
        assert_eq!(add_months(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn test_same_day() {
        let morning = ymd(2024, 5, 1).and_hms_opt(8, 0, 0).unwrap();
        let evening = ymd(2024, 5, 1).and_hms_opt(23, 59, 59).unwrap();
        let next_morning = ymd(2024, 5, 2).and_hms_opt(0, 0, 0).unwrap();
        assert!(is_same_day(morning, evening));
        assert!(is_same_day(&morning, ymd(2024, 5, 1)));
        assert!(is_same_day(evening, next_morning) == false);
    }

    #[test]
    fn test_days_between() {
        let days: Vec<_> = days_between(ymd(2024, 2, 27), ymd(2024, 3, 2)).collect();
        assert_eq!(days, vec![ymd(2024, 2, 27), ymd(2024, 2, 28), ymd(2024, 2, 29), ymd(2024, 3, 1), ymd(2024, 3, 2)]);
        assert_eq!(next_day(ymd(2024, 12, 31)), Some(ymd(2025, 1, 1)));
    }

    #[test]
    fn test_parse_date_time() {
        let expected = ymd(2024, 5, 1).and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(parse_date_time("2024-05-01T10:30:00"), Some(expected));
        assert_eq!(parse_date_time("2024-05-01 10:30"), Some(expected));
        assert_eq!(parse_date_time("2024-05-01"), Some(ymd(2024, 5, 1).and_hms_opt(0, 0, 0).unwrap()));
        assert_eq!(parse_date_time("not a date"), None);

        assert_eq!(format_date_time(&expected), "2024-05-01T10:30:00");
    }

    #[test]
    fn test_parse_date_time_with_offset_gives_local_time() {
        let utc = ymd(2024, 4, 30).and_hms_opt(22, 0, 0).unwrap();
        let local = Utc.from_utc_datetime(&utc).with_timezone(&Local).naive_local();
        assert_eq!(parse_date_time("2024-04-30T22:00:00.000Z"), Some(local));
        assert_eq!(parse_date_time("2024-05-01T00:00:00+02:00"), Some(local));
    }
}

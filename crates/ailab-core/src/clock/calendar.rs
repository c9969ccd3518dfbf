//! Weekday/date arithmetic for the clock intents.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

use super::source::{Clock, SystemClock};

/// Answer when a date cannot be parsed.
pub const DATE_FALLBACK: &str = "Enter a date in MM/DD/YYYY format.";

/// Answer when a weekday name cannot be parsed.
pub const WEEKDAY_FALLBACK: &str =
    "I can only determine dates for today or named days of the week.";

/// Accepted date layouts, month-first ones before anything else.
/// `%y` precedes `%Y` so that `12/25/24` means 2024 rather than year 24.
const DATE_FORMATS: &[&str] = &[
    "%m/%d/%y",
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
];

/// Date-and-time layouts; only the date part is kept.
const DATE_TIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Years a calendar date may fall in.
const YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Sunday-first, matching the week layout used for date lookups.
const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Full English name of a weekday.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Short US date: `M/D/YYYY` without zero padding.
pub fn format_short_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Parse a full weekday name, ignoring case and surrounding whitespace.
pub fn parse_weekday(day: &str) -> Option<Weekday> {
    let day = day.trim();
    WEEK.into_iter()
        .find(|candidate| weekday_name(*candidate).eq_ignore_ascii_case(day))
}

/// Parse a calendar date in years 1 to 9999. A trailing time of day is
/// ignored and a bare `M/D` is taken to be in `current_year`.
pub fn parse_date(date: &str, current_year: i32) -> Option<NaiveDate> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(date, format).ok())
                .map(|moment| moment.date())
        })
        .or_else(|| NaiveDate::parse_from_str(&format!("{date}/{current_year}"), "%m/%d/%Y").ok())
        .filter(|parsed| YEARS.contains(&parsed.year()))
}

/// Weekday name for `date`, using the system clock for yearless dates.
pub fn day_for_date(date: &str) -> String {
    day_for_date_at(date, &SystemClock)
}

/// Weekday name for `date`, or [`DATE_FALLBACK`] if it does not parse.
pub fn day_for_date_at<C: Clock + ?Sized>(date: &str, clock: &C) -> String {
    match parse_date(date, clock.today().year()) {
        Some(parsed) => weekday_name(parsed.weekday()).to_string(),
        None => DATE_FALLBACK.to_string(),
    }
}

/// Date of the named weekday in the current week, using the system clock.
pub fn date_for_weekday(day: &str) -> String {
    date_for_weekday_at(day, &SystemClock)
}

/// Date of the named weekday within the current Sunday-started week.
///
/// The answer is always within six days of today and never moves to the
/// previous or next week. Unparseable input yields [`WEEKDAY_FALLBACK`].
pub fn date_for_weekday_at<C: Clock + ?Sized>(day: &str, clock: &C) -> String {
    let Some(weekday) = parse_weekday(day) else {
        return WEEKDAY_FALLBACK.to_string();
    };
    let today = clock.today();
    let offset = i64::from(weekday.num_days_from_sunday())
        - i64::from(today.weekday().num_days_from_sunday());
    format_short_date(today + Duration::days(offset))
}

//! Clock intent handling.
//!
//! Turns a recognized intent plus its entities into a one-line answer:
//! the time in a city, the weekday of a date, or the date of a weekday in
//! the current week. Everything here is pure apart from reading the
//! current instant through a [`Clock`].

pub mod calendar;
pub mod dispatcher;
pub mod recognition;
pub mod source;
pub mod time;

pub use calendar::{
    date_for_weekday, date_for_weekday_at, day_for_date, day_for_date_at, format_short_date,
    parse_date, parse_weekday, weekday_name, DATE_FALLBACK, WEEKDAY_FALLBACK,
};
pub use dispatcher::{dispatch, Intent, IntentDispatcher, CONFIDENCE_THRESHOLD, FALLBACK_MESSAGE};
pub use recognition::{
    DetailedRecognition, Entity, EntityCategory, IntentRecognizer, RecognitionResult,
};
pub use source::{Clock, FixedClock, SystemClock};
pub use time::{
    format_clock_time, time_for_location, time_for_location_at, LocationOffset,
    LocationOffsetTable, Offset, LOCAL,
};

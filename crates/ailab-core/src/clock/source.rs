//! Source of the current instant.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, Utc};

/// Supplies "now" to the clock functions.
///
/// Production code uses [`SystemClock`]; tests pin the instant with
/// [`FixedClock`] so answers are reproducible.
pub trait Clock {
    /// Current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Current wall-clock time in the caller's local zone.
    fn now_local(&self) -> NaiveDateTime;

    /// Today's local calendar date.
    fn today(&self) -> NaiveDate {
        self.now_local().date()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_utc(&self) -> DateTime<Utc> {
        (**self).now_utc()
    }

    fn now_local(&self) -> NaiveDateTime {
        (**self).now_local()
    }
}

/// The operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at one instant, with a fixed local offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    utc: DateTime<Utc>,
    local_offset: FixedOffset,
}

impl FixedClock {
    pub fn new(utc: DateTime<Utc>, local_offset: FixedOffset) -> Self {
        Self { utc, local_offset }
    }

    /// Frozen clock whose local zone is UTC.
    pub fn at_utc(utc: DateTime<Utc>) -> Self {
        Self::new(utc, Utc.fix())
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.utc
    }

    fn now_local(&self) -> NaiveDateTime {
        self.utc.with_timezone(&self.local_offset).naive_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn fixed_clock_applies_local_offset() {
        let utc = Utc.with_ymd_and_hms(2025, 6, 14, 23, 30, 0).unwrap();
        let clock = FixedClock::new(utc, FixedOffset::east_opt(2 * 3600).unwrap());
        assert_eq!(clock.now_utc(), utc);
        assert_eq!(clock.now_local().hour(), 1);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
    }

    #[test]
    fn at_utc_keeps_wall_clock_equal_to_utc() {
        let utc = Utc.with_ymd_and_hms(2024, 12, 25, 8, 5, 0).unwrap();
        let clock = FixedClock::at_utc(utc);
        assert_eq!(clock.now_local(), utc.naive_utc());
    }

    #[test]
    fn references_are_clocks_too() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = FixedClock::at_utc(utc);
        let dynamic: &dyn Clock = &clock;
        assert_eq!((&dynamic).now_utc(), utc);
    }
}

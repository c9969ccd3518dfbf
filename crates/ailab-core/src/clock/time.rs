//! Time of day in a handful of known cities.
//!
//! Offsets are fixed constants. There is no timezone database and no
//! daylight-saving adjustment.

use chrono::{Duration, NaiveDateTime, Timelike};

use super::source::{Clock, SystemClock};

/// Location name meaning "the caller's own wall clock".
pub const LOCAL: &str = "local";

/// How to derive the time for a table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    /// System local time.
    Local,
    /// UTC plus a fixed number of minutes.
    Utc { minutes: i32 },
}

impl Offset {
    /// Offset from UTC in (possibly fractional) hours; `None` for [`Offset::Local`].
    pub fn hours(&self) -> Option<f64> {
        match self {
            Offset::Local => None,
            Offset::Utc { minutes } => Some(f64::from(*minutes) / 60.0),
        }
    }
}

/// One row of the [`LocationOffsetTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOffset {
    /// Lower-cased city name.
    pub name: &'static str,
    pub offset: Offset,
}

const fn utc_hours(hours: i32) -> Offset {
    Offset::Utc {
        minutes: hours * 60,
    }
}

static BUILTIN_OFFSETS: [LocationOffset; 7] = [
    LocationOffset {
        name: LOCAL,
        offset: Offset::Local,
    },
    LocationOffset {
        name: "london",
        offset: utc_hours(0),
    },
    LocationOffset {
        name: "sydney",
        offset: utc_hours(11),
    },
    LocationOffset {
        name: "new york",
        offset: utc_hours(-5),
    },
    LocationOffset {
        name: "nairobi",
        offset: utc_hours(3),
    },
    LocationOffset {
        name: "tokyo",
        offset: utc_hours(9),
    },
    LocationOffset {
        name: "delhi",
        offset: Offset::Utc { minutes: 330 },
    },
];

/// Read-only mapping from lower-cased city name to its offset.
#[derive(Debug, Clone, Copy)]
pub struct LocationOffsetTable {
    entries: &'static [LocationOffset],
}

impl LocationOffsetTable {
    /// The process-wide table of supported cities.
    pub fn builtin() -> Self {
        Self {
            entries: &BUILTIN_OFFSETS,
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, location: &str) -> Option<Offset> {
        let key = location.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.name == key)
            .map(|entry| entry.offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static LocationOffset> {
        let entries: &'static [LocationOffset] = self.entries;
        entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render as `H:mm`: no leading zero on the hour, two-digit minutes.
pub fn format_clock_time(time: NaiveDateTime) -> String {
    format!("{}:{:02}", time.hour(), time.minute())
}

/// Current time in `location` using the system clock.
pub fn time_for_location(location: &str) -> String {
    time_for_location_at(location, &SystemClock)
}

/// Current time in `location` as seen by `clock`.
///
/// Unknown locations yield `I don't know what time it is in {location}`,
/// echoing the input exactly as given.
pub fn time_for_location_at<C: Clock + ?Sized>(location: &str, clock: &C) -> String {
    let time = match LocationOffsetTable::builtin().get(location) {
        Some(Offset::Local) => clock.now_local(),
        Some(Offset::Utc { minutes }) => {
            clock.now_utc().naive_utc() + Duration::minutes(i64::from(minutes))
        }
        None => return format!("I don't know what time it is in {location}"),
    };
    format_clock_time(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::source::FixedClock;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn clock() -> FixedClock {
        // 22:07 UTC, local zone UTC-7 (15:07 local)
        FixedClock::new(
            Utc.with_ymd_and_hms(2025, 6, 14, 22, 7, 0).unwrap(),
            FixedOffset::west_opt(7 * 3600).unwrap(),
        )
    }

    #[test]
    fn local_uses_wall_clock() {
        assert_eq!(time_for_location_at("local", &clock()), "15:07");
        assert_eq!(time_for_location_at("LOCAL", &clock()), "15:07");
    }

    #[test]
    fn fixed_offsets_wrap_past_midnight() {
        let c = clock();
        assert_eq!(time_for_location_at("London", &c), "22:07");
        assert_eq!(time_for_location_at("sydney", &c), "9:07");
        assert_eq!(time_for_location_at("New York", &c), "17:07");
        assert_eq!(time_for_location_at("nairobi", &c), "1:07");
        assert_eq!(time_for_location_at("Tokyo", &c), "7:07");
    }

    #[test]
    fn delhi_adds_half_hour() {
        assert_eq!(time_for_location_at("delhi", &clock()), "3:37");
    }

    #[test]
    fn unknown_location_echoes_input_casing() {
        assert_eq!(
            time_for_location_at("Paris", &clock()),
            "I don't know what time it is in Paris"
        );
        assert_eq!(
            time_for_location_at("", &clock()),
            "I don't know what time it is in "
        );
    }

    #[test]
    fn surrounding_whitespace_is_not_a_match() {
        assert_eq!(
            time_for_location_at(" tokyo", &clock()),
            "I don't know what time it is in  tokyo"
        );
    }

    #[test]
    fn table_reports_fractional_hours() {
        let table = LocationOffsetTable::builtin();
        assert_eq!(table.len(), 7);
        assert_eq!(table.get("DELHI").and_then(|o| o.hours()), Some(5.5));
        assert_eq!(table.get("new york").and_then(|o| o.hours()), Some(-5.0));
        assert_eq!(table.get("local"), Some(Offset::Local));
        assert_eq!(table.get("newyork"), None);
    }

    #[test]
    fn minutes_are_zero_padded() {
        let c = FixedClock::at_utc(Utc.with_ymd_and_hms(2025, 1, 1, 0, 3, 0).unwrap());
        assert_eq!(time_for_location_at("london", &c), "0:03");
    }
}

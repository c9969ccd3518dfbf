//! Intent-to-answer dispatch for the clock client.

use super::calendar::{date_for_weekday_at, day_for_date_at, format_short_date, weekday_name};
use super::recognition::{EntityCategory, RecognitionResult};
use super::source::{Clock, SystemClock};
use super::time::{time_for_location_at, LOCAL};
use chrono::Datelike;

/// Answer for low-confidence or unsupported intents.
pub const FALLBACK_MESSAGE: &str = "Try asking me for the time, the day, or the date.";

/// Intents are accepted only when their confidence is strictly above this.
pub const CONFIDENCE_THRESHOLD: f64 = 0.5;

/// The intents the clock model is trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    GetTime,
    GetDay,
    GetDate,
}

impl Intent {
    /// Exact, case-sensitive label match.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "GetTime" => Some(Intent::GetTime),
            "GetDay" => Some(Intent::GetDay),
            "GetDate" => Some(Intent::GetDate),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Intent::GetTime => "GetTime",
            Intent::GetDay => "GetDay",
            Intent::GetDate => "GetDate",
        }
    }

    /// Entity category that parameterises this intent.
    pub fn entity_category(&self) -> EntityCategory {
        match self {
            Intent::GetTime => EntityCategory::Location,
            Intent::GetDay => EntityCategory::Date,
            Intent::GetDate => EntityCategory::Weekday,
        }
    }
}

/// Selects an action for a recognition result and renders the answer.
///
/// Holds nothing but its clock, so one instance can serve any number of
/// callers.
#[derive(Debug, Clone, Default)]
pub struct IntentDispatcher<C = SystemClock> {
    clock: C,
}

impl IntentDispatcher<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> IntentDispatcher<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// The intent to act on, or `None` when confidence is too low or the
    /// label is not one of ours. Confidence is checked first.
    pub fn accepted_intent(&self, result: &RecognitionResult) -> Option<Intent> {
        if result.confidence_score > CONFIDENCE_THRESHOLD {
            Intent::from_label(&result.top_intent)
        } else {
            None
        }
    }

    /// Produce the one-line answer for `result`.
    pub fn dispatch(&self, result: &RecognitionResult) -> String {
        let Some(intent) = self.accepted_intent(result) else {
            return FALLBACK_MESSAGE.to_string();
        };
        let argument = result.last_entity(intent.entity_category());

        match intent {
            Intent::GetTime => time_for_location_at(argument.unwrap_or(LOCAL), &self.clock),
            Intent::GetDay => {
                let date = argument
                    .map(str::to_string)
                    .unwrap_or_else(|| format_short_date(self.clock.today()));
                day_for_date_at(&date, &self.clock)
            }
            Intent::GetDate => {
                let day = argument.unwrap_or_else(|| weekday_name(self.clock.today().weekday()));
                date_for_weekday_at(day, &self.clock)
            }
        }
    }
}

/// Dispatch against the system clock.
pub fn dispatch(result: &RecognitionResult) -> String {
    IntentDispatcher::new().dispatch(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::calendar::{DATE_FALLBACK, WEEKDAY_FALLBACK};
    use crate::clock::recognition::Entity;
    use crate::clock::source::FixedClock;
    use chrono::{TimeZone, Utc};

    /// Saturday 14 June 2025, 09:05 UTC, local zone UTC.
    fn dispatcher() -> IntentDispatcher<FixedClock> {
        IntentDispatcher::with_clock(FixedClock::at_utc(
            Utc.with_ymd_and_hms(2025, 6, 14, 9, 5, 0).unwrap(),
        ))
    }

    #[test]
    fn confidence_at_threshold_is_rejected() {
        let result = RecognitionResult::new("GetTime", 0.5);
        assert_eq!(dispatcher().dispatch(&result), FALLBACK_MESSAGE);
    }

    #[test]
    fn confidence_just_above_threshold_is_accepted() {
        let result = RecognitionResult::new("GetTime", 0.500_001);
        assert_eq!(dispatcher().dispatch(&result), "9:05");
    }

    #[test]
    fn nan_confidence_is_rejected() {
        let result = RecognitionResult::new("GetTime", f64::NAN);
        assert_eq!(dispatcher().dispatch(&result), FALLBACK_MESSAGE);
    }

    #[test]
    fn low_confidence_ignores_entities() {
        let result = RecognitionResult::new("GetTime", 0.2)
            .with_entity(Entity::new("Location", "Atlantis"));
        assert_eq!(dispatcher().dispatch(&result), FALLBACK_MESSAGE);
    }

    #[test]
    fn unknown_and_empty_intents_fall_back() {
        for label in ["None", "", "gettime", "GetWeather"] {
            let result = RecognitionResult::new(label, 0.99);
            assert_eq!(dispatcher().dispatch(&result), FALLBACK_MESSAGE, "label {label:?}");
        }
    }

    #[test]
    fn get_time_defaults_to_local() {
        let result = RecognitionResult::new("GetTime", 0.9);
        assert_eq!(dispatcher().dispatch(&result), "9:05");
    }

    #[test]
    fn get_time_uses_last_location() {
        let result = RecognitionResult::new("GetTime", 0.9)
            .with_entity(Entity::new("Location", "London"))
            .with_entity(Entity::new("Location", "Tokyo"));
        assert_eq!(dispatcher().dispatch(&result), "18:05");
    }

    #[test]
    fn get_time_ignores_other_categories() {
        let result = RecognitionResult::new("GetTime", 0.9)
            .with_entity(Entity::new("Location", "Sydney"))
            .with_entity(Entity::new("City", "Paris"));
        assert_eq!(dispatcher().dispatch(&result), "20:05");
    }

    #[test]
    fn get_time_unknown_city() {
        let result = RecognitionResult::new("GetTime", 0.9)
            .with_entity(Entity::new("Location", "Paris"));
        assert_eq!(
            dispatcher().dispatch(&result),
            "I don't know what time it is in Paris"
        );
    }

    #[test]
    fn get_day_defaults_to_today() {
        let result = RecognitionResult::new("GetDay", 0.9);
        assert_eq!(dispatcher().dispatch(&result), "Saturday");
    }

    #[test]
    fn get_day_uses_last_date() {
        let result = RecognitionResult::new("GetDay", 0.9)
            .with_entity(Entity::new("Date", "1/1/2025"))
            .with_entity(Entity::new("Date", "12/25/2024"));
        assert_eq!(dispatcher().dispatch(&result), "Wednesday");
    }

    #[test]
    fn get_day_bad_date() {
        let result = RecognitionResult::new("GetDay", 0.9)
            .with_entity(Entity::new("Date", "someday"));
        assert_eq!(dispatcher().dispatch(&result), DATE_FALLBACK);
    }

    #[test]
    fn get_date_defaults_to_today() {
        let result = RecognitionResult::new("GetDate", 0.9);
        assert_eq!(dispatcher().dispatch(&result), "6/14/2025");
    }

    #[test]
    fn get_date_uses_last_weekday() {
        let result = RecognitionResult::new("GetDate", 0.9)
            .with_entity(Entity::new("Weekday", "Friday"))
            .with_entity(Entity::new("Weekday", "Monday"));
        assert_eq!(dispatcher().dispatch(&result), "6/9/2025");
    }

    #[test]
    fn get_date_bad_weekday() {
        let result = RecognitionResult::new("GetDate", 0.9)
            .with_entity(Entity::new("Weekday", "Funday"));
        assert_eq!(dispatcher().dispatch(&result), WEEKDAY_FALLBACK);
    }

    #[test]
    fn intent_labels_round_trip() {
        for intent in [Intent::GetTime, Intent::GetDay, Intent::GetDate] {
            assert_eq!(Intent::from_label(intent.label()), Some(intent));
        }
    }
}

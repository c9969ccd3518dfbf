use ailab_core::clock::{format_short_date, weekday_name, LOCAL};
use ailab_core::labs::clock_client::{self, AnswerSpeaker, ChatOptions};
use ailab_core::services::SpeechClient;
use ailab_core::{
    date_for_weekday, day_for_date, time_for_location, Clock, CognitiveService, ConversationClient,
    Entity, IntentDispatcher, RecognitionResult, SystemClock,
};
use chrono::Datelike;
use clap::Subcommand;
use std::path::{Path, PathBuf};

use super::{block_on, service_settings};

#[derive(Subcommand)]
pub enum ClockAction {
    /// Chat with the clock through conversation analysis
    Chat {
        /// Print the recognizer output as JSON
        #[arg(long)]
        show_json: bool,
        /// Speak each answer into answer-N.wav files in this folder
        #[arg(long, value_name = "DIR")]
        speak_dir: Option<PathBuf>,
    },
    /// Answer a hand-built recognition result without calling any service
    Ask {
        /// Intent label (GetTime, GetDay, GetDate)
        #[arg(long)]
        intent: String,
        /// Recognizer confidence
        #[arg(long, default_value_t = 1.0)]
        confidence: f64,
        /// Entity as Category=Text; repeatable, later ones win
        #[arg(long = "entity", value_name = "CATEGORY=TEXT", value_parser = parse_entity)]
        entities: Vec<Entity>,
    },
    /// Time in a location (defaults to local time)
    Time { location: Vec<String> },
    /// Day of the week for a date (defaults to today)
    Day { date: Vec<String> },
    /// Date of a weekday in the current week (defaults to today)
    Date { weekday: Vec<String> },
}

fn parse_entity(raw: &str) -> Result<Entity, String> {
    match raw.split_once('=') {
        Some((category, text)) if !category.is_empty() => Ok(Entity::new(category, text)),
        _ => Err(format!("expected CATEGORY=TEXT, got '{raw}'")),
    }
}

/// Join words given on the command line, or `None` when there are none.
fn joined(words: &[String]) -> Option<String> {
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

pub fn run(action: ClockAction, settings: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ClockAction::Chat {
            show_json,
            speak_dir,
        } => chat(show_json, speak_dir, settings)?,
        ClockAction::Ask {
            intent,
            confidence,
            entities,
        } => {
            let result = entities
                .into_iter()
                .fold(RecognitionResult::new(intent, confidence), RecognitionResult::with_entity);
            println!("{}", IntentDispatcher::new().dispatch(&result));
        }
        ClockAction::Time { location } => {
            let location = joined(&location).unwrap_or_else(|| LOCAL.to_string());
            println!("{}", time_for_location(&location));
        }
        ClockAction::Day { date } => {
            let date = joined(&date).unwrap_or_else(|| format_short_date(SystemClock.today()));
            println!("{}", day_for_date(&date));
        }
        ClockAction::Date { weekday } => {
            let weekday = joined(&weekday)
                .unwrap_or_else(|| weekday_name(SystemClock.today().weekday()).to_string());
            println!("{}", date_for_weekday(&weekday));
        }
    }
    Ok(())
}

fn chat(
    show_json: bool,
    speak_dir: Option<PathBuf>,
    settings: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = service_settings(settings)?;
    let recognizer = ConversationClient::from_settings(&settings)?;
    let speech = match speak_dir {
        Some(_) => Some(SpeechClient::from_settings(&settings)?),
        None => None,
    };
    let speaker = speech
        .as_ref()
        .zip(speak_dir)
        .map(|(client, dir)| AnswerSpeaker::new(client, settings.speech.voice.clone(), dir));

    let options = ChatOptions { show_json, speaker };
    let dispatcher = IntentDispatcher::new();
    let mut input = std::io::stdin().lock();
    let mut out = std::io::stdout().lock();

    let answers = block_on(clock_client::run_chat(
        &recognizer,
        &dispatcher,
        &options,
        &mut input,
        &mut out,
    ))??;
    tracing::info!(count = answers.len(), "chat finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_argument_splits_on_first_equals() {
        let entity = parse_entity("Date=1=2").unwrap();
        assert_eq!(entity.category, "Date");
        assert_eq!(entity.text, "1=2");
    }

    #[test]
    fn entity_argument_needs_category() {
        assert!(parse_entity("=Tokyo").is_err());
        assert!(parse_entity("Tokyo").is_err());
    }

    #[test]
    fn words_are_joined_with_spaces() {
        assert_eq!(joined(&["New".into(), "York".into()]).as_deref(), Some("New York"));
        assert_eq!(joined(&[]), None);
    }
}

use ailab_core::services::{
    ClassificationClient, QuestionAnsweringClient, SpeechClient, TextAnalyticsClient,
    TranslatorClient,
};
use ailab_core::{CognitiveService, ConversationClient, Settings};
use std::path::Path;

use super::SettingsFile;

/// One line of the status table.
struct ServiceStatus {
    name: &'static str,
    missing: Vec<&'static str>,
}

fn status_of<S: CognitiveService>(settings: &Settings) -> ServiceStatus {
    ServiceStatus {
        name: S::NAME,
        missing: S::missing_settings(settings),
    }
}

fn collect(settings: &Settings) -> Vec<ServiceStatus> {
    vec![
        status_of::<ConversationClient>(settings),
        status_of::<TextAnalyticsClient>(settings),
        status_of::<QuestionAnsweringClient>(settings),
        status_of::<ClassificationClient>(settings),
        status_of::<TranslatorClient>(settings),
        status_of::<SpeechClient>(settings),
    ]
}

pub fn run(settings: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let file = SettingsFile::open(settings)?;
    let mut effective = file.settings;
    effective.apply_env_overrides()?;

    println!("Settings: {}", file.path.display());
    let statuses = collect(&effective);
    let width = statuses.iter().map(|s| s.name.len()).max().unwrap_or(0);
    for status in statuses {
        if status.missing.is_empty() {
            println!("  {:<width$}  ready", status.name);
        } else {
            println!("  {:<width$}  missing {}", status.name, status.missing.join(", "));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_settings_report_credentials_missing() {
        let statuses = collect(&Settings::default());
        assert_eq!(statuses.len(), 6);
        let conversation = &statuses[0];
        assert_eq!(conversation.missing, ["language.endpoint", "language.key"]);
    }

    #[test]
    fn language_credentials_make_text_analytics_ready() {
        let mut settings = Settings::default();
        settings.set("language.endpoint", "https://res.cognitiveservices.azure.com/").unwrap();
        settings.set("language.key", "secret").unwrap();

        let statuses = collect(&settings);
        assert!(statuses[1].missing.is_empty());
        assert!(statuses[5].missing.contains(&"speech.key"));
    }
}

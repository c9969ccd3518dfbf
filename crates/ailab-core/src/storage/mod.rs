mod config;

pub use config::{
    ClassificationSettings, ConversationSettings, HttpSettings, LanguageSettings,
    QuestionAnsweringSettings, Settings, SpeechSettings, TranslatorSettings,
};

use crate::error::ConfigError;
use std::path::PathBuf;

/// Returns `~/.config/ailab[-dev]/` based on AILAB_ENV.
///
/// Set AILAB_ENV=dev to use a development settings directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("AILAB_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("ailab-dev")
    } else {
        base_dir.join("ailab")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

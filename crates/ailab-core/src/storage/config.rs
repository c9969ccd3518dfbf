//! TOML-based settings for the lab samples.
//!
//! Holds everything the samples need to reach the cloud services:
//! - Language resource endpoint and key
//! - Project/deployment names for conversation analysis, question answering
//!   and custom text classification
//! - Translator key and region
//! - Speech key, region and voices
//! - HTTP timeout and job polling limits
//!
//! Settings are stored at `~/.config/ailab/config.toml` unless a path is
//! given explicitly. The record is loaded once at startup and passed by
//! reference to whatever needs it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Language resource (text analytics, CLU, question answering, classification).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageSettings {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub key: String,
}

/// Conversational language understanding project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSettings {
    #[serde(default = "default_clock_project")]
    pub project: String,
    #[serde(default = "default_deployment")]
    pub deployment: String,
}

/// Custom question answering project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionAnsweringSettings {
    #[serde(default)]
    pub project: String,
    #[serde(default = "default_deployment")]
    pub deployment: String,
}

/// Custom text classification project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassificationSettings {
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub deployment: String,
}

/// Translator resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorSettings {
    #[serde(default = "default_translator_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub region: String,
}

/// Speech resource and synthesis voices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSettings {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub region: String,
    /// Recognition language for speech-to-text.
    #[serde(default = "default_speech_language")]
    pub language: String,
    /// Voice used for plain answers.
    #[serde(default = "default_voice")]
    pub voice: String,
    /// Voice used by the speaking clock announcement.
    #[serde(default = "default_clock_voice")]
    pub clock_voice: String,
}

/// HTTP behaviour shared by every client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Delay between polls of a long-running job.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

/// Application settings.
///
/// Serialized to/from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub language: LanguageSettings,
    #[serde(default)]
    pub conversation: ConversationSettings,
    #[serde(default)]
    pub question_answering: QuestionAnsweringSettings,
    #[serde(default)]
    pub classification: ClassificationSettings,
    #[serde(default)]
    pub translator: TranslatorSettings,
    #[serde(default)]
    pub speech: SpeechSettings,
    #[serde(default)]
    pub http: HttpSettings,
}

// Default functions
fn default_clock_project() -> String {
    "Clock".into()
}
fn default_deployment() -> String {
    "production".into()
}
fn default_translator_endpoint() -> String {
    "https://api.cognitive.microsofttranslator.com".into()
}
fn default_speech_language() -> String {
    "en-US".into()
}
fn default_voice() -> String {
    "en-US-AriaNeural".into()
}
fn default_clock_voice() -> String {
    "en-GB-LibbyNeural".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_max_polls() -> u32 {
    120
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            project: default_clock_project(),
            deployment: default_deployment(),
        }
    }
}

impl Default for QuestionAnsweringSettings {
    fn default() -> Self {
        Self {
            project: String::new(),
            deployment: default_deployment(),
        }
    }
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            endpoint: default_translator_endpoint(),
            key: String::new(),
            region: String::new(),
        }
    }
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            key: String::new(),
            region: String::new(),
            language: default_speech_language(),
            voice: default_voice(),
            clock_voice: default_clock_voice(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
        }
    }
}

/// Environment variables that override secrets from the settings file.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("AILAB_LANGUAGE_ENDPOINT", "language.endpoint"),
    ("AILAB_LANGUAGE_KEY", "language.key"),
    ("AILAB_TRANSLATOR_KEY", "translator.key"),
    ("AILAB_TRANSLATOR_REGION", "translator.region"),
    ("AILAB_SPEECH_KEY", "speech.key"),
    ("AILAB_SPEECH_REGION", "speech.region"),
];

impl Settings {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                ),
                serde_json::Value::Number(_) => match value.parse::<u64>() {
                    Ok(n) => serde_json::Value::Number(n.into()),
                    Err(_) => return Err(invalid(format!("cannot parse '{value}' as number"))),
                },
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot overwrite a whole section".to_string()))
                }
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default settings path under the user's config directory.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default path, writing defaults there on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be parsed,
    /// or if the default settings cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path()?;
        if path.exists() {
            return Self::load_from(&path);
        }
        let settings = Self::default();
        settings.save_to(&path)?;
        Ok(settings)
    }

    /// Load from an explicit file. The file must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist to an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a settings value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a settings value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit
    /// the field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a string value that must be present and non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] when the value is empty or the key
    /// does not name a leaf value.
    pub fn require(&self, key: &str) -> Result<String, ConfigError> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(ConfigError::MissingKey(key.to_string())),
        }
    }

    /// Keys from `keys` that are currently empty.
    pub fn missing<'k>(&self, keys: &[&'k str]) -> Vec<&'k str> {
        keys.iter()
            .copied()
            .filter(|key| self.require(key).is_err())
            .collect()
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if an override targets a key that does not exist.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (var, key) in ENV_OVERRIDES {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                tracing::debug!(var, key, "settings override from environment");
                self.set(key, &value)?;
            }
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Settings::apply_env_with`].
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|var| std::env::var(var).ok())
    }

    /// Request timeout for HTTP clients.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.http.timeout_secs.max(1))
    }

    /// Delay between polls of a long-running job.
    pub fn poll_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.http.poll_interval_ms)
    }
}

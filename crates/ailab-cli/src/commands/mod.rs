pub mod analyze;
pub mod classify;
pub mod clock;
pub mod config;
pub mod qna;
pub mod speaking_clock;
pub mod speech_translate;
pub mod status;
pub mod translate;

use ailab_core::{ConfigError, Settings};
use std::future::Future;
use std::path::{Path, PathBuf};

/// A settings record and the file it came from.
pub struct SettingsFile {
    pub path: PathBuf,
    pub settings: Settings,
}

impl SettingsFile {
    /// Open `explicit` if given (defaults when it does not exist yet),
    /// otherwise the default settings file.
    pub fn open(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                let settings = if path.exists() {
                    Settings::load_from(path)?
                } else {
                    Settings::default()
                };
                Ok(Self {
                    path: path.to_path_buf(),
                    settings,
                })
            }
            None => Ok(Self {
                path: Settings::default_path()?,
                settings: Settings::load()?,
            }),
        }
    }
}

/// Settings for talking to services: file values plus environment overrides.
pub fn service_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut settings = SettingsFile::open(explicit)?.settings;
    settings.apply_env_overrides()?;
    Ok(settings)
}

/// Run an async sample to completion on a fresh runtime.
pub fn block_on<F: Future>(future: F) -> std::io::Result<F::Output> {
    let runtime = tokio::runtime::Runtime::new()?;
    Ok(runtime.block_on(future))
}

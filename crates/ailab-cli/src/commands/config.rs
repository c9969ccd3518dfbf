use ailab_core::ConfigError;
use clap::Subcommand;
use std::path::Path;

use super::SettingsFile;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a settings value
    Get {
        /// Settings key (e.g. "language.endpoint", "speech.voice")
        key: String,
    },
    /// Set a settings value
    Set {
        /// Settings key
        key: String,
        /// New value
        value: String,
    },
    /// List all settings
    List,
    /// Reset settings to defaults
    Reset,
    /// Print the settings file location
    Path,
}

pub fn run(action: ConfigAction, settings: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let file = SettingsFile::open(settings)?;
    match action {
        ConfigAction::Get { key } => match file.settings.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(ConfigError::UnknownKey(key).into()),
        },
        ConfigAction::Set { key, value } => {
            let mut updated = file.settings;
            updated.set(&key, &value)?;
            updated.save_to(&file.path)?;
            println!("ok");
        }
        ConfigAction::List => {
            let rendered = toml::to_string_pretty(&file.settings)?;
            print!("{rendered}");
        }
        ConfigAction::Reset => {
            ailab_core::Settings::default().save_to(&file.path)?;
            println!("settings reset to defaults");
        }
        ConfigAction::Path => println!("{}", file.path.display()),
    }
    Ok(())
}

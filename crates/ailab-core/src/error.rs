//! Core error types for ailab-core.
//!
//! The clock dispatcher never fails; these errors come from the settings
//! layer and from the cloud service clients around it.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ailab-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cloud service errors
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load settings from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save settings to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid settings value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the settings schema
    #[error("Unknown settings key: {0}")]
    UnknownKey(String),

    /// Required value is absent or empty
    #[error("Missing required settings key: {0} (set it with `ailab config set {0} <value>`)")]
    MissingKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse settings: {0}")]
    ParseFailed(String),

    /// Config directory could not be determined or created
    #[error("Settings directory unavailable: {0}")]
    DataDir(String),
}

/// Errors raised while talking to a cloud AI service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Endpoint setting is not a usable URL
    #[error("Invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// Transport-level failure (DNS, TLS, timeout, ...)
    #[error("Request to {service} failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status
    #[error("{service} returned HTTP {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// Response body did not match the expected shape
    #[error("Malformed {service} response: {source}")]
    Malformed {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Service answered 2xx but reported an error in the payload
    #[error("{service} reported an error: {message}")]
    Reported {
        service: &'static str,
        message: String,
    },

    /// Required response header absent
    #[error("{service} response is missing the '{header}' header")]
    MissingHeader {
        service: &'static str,
        header: &'static str,
    },

    /// Long-running job ended in a non-success state
    #[error("{service} job ended with status '{status}': {message}")]
    JobFailed {
        service: &'static str,
        status: String,
        message: String,
    },

    /// Long-running job still pending after the polling budget
    #[error("{service} job did not finish after {polls} polls")]
    JobTimeout { service: &'static str, polls: u32 },

    /// WAV input/output failure
    #[error("Audio error for {path}: {message}")]
    Audio { path: PathBuf, message: String },
}

impl ServiceError {
    pub(crate) fn http(service: &'static str, source: reqwest::Error) -> Self {
        ServiceError::Http { service, source }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

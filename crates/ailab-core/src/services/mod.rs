//! REST clients for the cloud AI services used by the lab samples.
//!
//! Each client is built from [`Settings`] and speaks plain JSON over HTTPS.
//! Responses are deserialized into typed structs here, at the boundary;
//! nothing downstream sees untyped JSON.

pub mod classification;
pub mod conversation;
pub mod question_answering;
pub mod speech;
pub mod text_analytics;
pub mod translator;

pub use classification::{ClassificationClient, ClassificationOutcome, DocumentClassification};
pub use conversation::ConversationClient;
pub use question_answering::{KnowledgeBaseAnswer, QuestionAnsweringClient};
pub use speech::{SpeechClient, SpeechRecognition, WavAudio};
pub use text_analytics::{DocumentAnalysis, TextAnalyticsClient};
pub use translator::{TranslatorClient, TextTranslation};

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use crate::error::{CoreError, ServiceError};
use crate::storage::Settings;

pub(crate) const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
pub(crate) const SUBSCRIPTION_REGION_HEADER: &str = "Ocp-Apim-Subscription-Region";

/// Every cloud client implements this trait so the CLI can report which
/// samples are ready to run.
pub trait CognitiveService: Sized {
    /// Human-readable service name, also used in errors and logs.
    const NAME: &'static str;

    /// Settings keys that must be non-empty before the client can be built.
    const REQUIRED_SETTINGS: &'static [&'static str];

    /// Build the client from settings.
    ///
    /// # Errors
    /// Fails with a missing-key error when a required setting is empty, or
    /// when the endpoint is not a valid URL.
    fn from_settings(settings: &Settings) -> Result<Self, CoreError>;

    /// Required keys that are currently empty.
    fn missing_settings(settings: &Settings) -> Vec<&'static str> {
        settings.missing(Self::REQUIRED_SETTINGS)
    }
}

/// Error envelope shared by the Azure AI services.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

/// Code/message pair reported by a service.
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code.is_empty(), self.message.is_empty()) {
            (false, false) => write!(f, "{}: {}", self.code, self.message),
            (false, true) => f.write_str(&self.code),
            _ => f.write_str(&self.message),
        }
    }
}

pub(crate) fn http_client(service: &'static str, timeout: Duration) -> Result<Client, ServiceError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("ailab/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ServiceError::http(service, e))
}

/// Join `path` onto a resource endpoint such as
/// `https://myresource.cognitiveservices.azure.com/`.
pub(crate) fn endpoint_url(endpoint: &str, path: &str) -> Result<Url, ServiceError> {
    let invalid = |source| ServiceError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    };
    let mut base = Url::parse(endpoint.trim()).map_err(invalid)?;
    if !base.path().ends_with('/') {
        let path_with_slash = format!("{}/", base.path());
        base.set_path(&path_with_slash);
    }
    base.join(path).map_err(invalid)
}

/// Turn a non-success status into [`ServiceError::Status`], preferring the
/// service's own error message over the raw body.
pub(crate) fn status_error(service: &'static str, status: u16, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.to_string())
        .unwrap_or_else(|_| body.trim().to_string());
    ServiceError::Status {
        service,
        status,
        message,
    }
}

/// Read the body as text after checking the status.
pub(crate) async fn read_text(service: &'static str, resp: Response) -> Result<String, ServiceError> {
    let status = resp.status();
    let body = resp.text().await.map_err(|e| ServiceError::http(service, e))?;
    tracing::debug!(service, status = status.as_u16(), bytes = body.len(), "response received");
    if !status.is_success() {
        return Err(status_error(service, status.as_u16(), &body));
    }
    Ok(body)
}

/// Read and deserialize a JSON body after checking the status.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: &'static str,
    resp: Response,
) -> Result<T, ServiceError> {
    let body = read_text(service, resp).await?;
    serde_json::from_str(&body).map_err(|source| ServiceError::Malformed { service, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_handles_trailing_slash() {
        let with = endpoint_url("https://res.cognitiveservices.azure.com/", "language/:analyze-text").unwrap();
        let without = endpoint_url("https://res.cognitiveservices.azure.com", "language/:analyze-text").unwrap();
        assert_eq!(with, without);
        assert_eq!(
            with.as_str(),
            "https://res.cognitiveservices.azure.com/language/:analyze-text"
        );
    }

    #[test]
    fn endpoint_url_keeps_base_path() {
        let url = endpoint_url("http://127.0.0.1:9000/proxy", "translate").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/proxy/translate");
    }

    #[test]
    fn endpoint_url_rejects_garbage() {
        assert!(matches!(
            endpoint_url("not a url", "x"),
            Err(ServiceError::InvalidEndpoint { .. })
        ));
    }

    #[test]
    fn status_error_prefers_service_message() {
        let err = status_error(
            "test",
            401,
            r#"{"error":{"code":"401","message":"Access denied due to invalid subscription key."}}"#,
        );
        assert_eq!(
            err.to_string(),
            "test returned HTTP 401: 401: Access denied due to invalid subscription key."
        );

        let raw = status_error("test", 500, "  upstream exploded \n");
        assert_eq!(raw.to_string(), "test returned HTTP 500: upstream exploded");
    }
}

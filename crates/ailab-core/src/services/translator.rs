//! Text translation (Translator v3 REST API).

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

use super::{
    endpoint_url, http_client, read_json, CognitiveService, SUBSCRIPTION_KEY_HEADER,
    SUBSCRIPTION_REGION_HEADER,
};
use crate::error::{CoreError, ServiceError};
use crate::storage::Settings;

const SERVICE: &str = "translator";
const API_VERSION: &str = "3.0";

pub struct TranslatorClient {
    http: Client,
    endpoint: String,
    key: String,
    region: String,
}

/// A language the service can translate into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInfo {
    pub name: String,
    #[serde(default)]
    pub native_name: String,
    #[serde(default)]
    pub dir: String,
}

#[derive(Debug, Deserialize)]
struct LanguagesResult {
    #[serde(default)]
    translation: BTreeMap<String, LanguageInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSourceLanguage {
    pub language: String,
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    pub to: String,
}

/// Translation of one input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextTranslation {
    #[serde(default)]
    pub detected_language: Option<DetectedSourceLanguage>,
    #[serde(default)]
    pub translations: Vec<Translation>,
}

impl TextTranslation {
    /// Detected source language code, if the service reported one.
    pub fn source_language(&self) -> Option<&str> {
        self.detected_language.as_ref().map(|d| d.language.as_str())
    }

    pub fn first(&self) -> Option<&Translation> {
        self.translations.first()
    }
}

impl TranslatorClient {
    pub fn new(
        endpoint: impl Into<String>,
        key: impl Into<String>,
        region: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, ServiceError> {
        let endpoint = endpoint.into();
        endpoint_url(&endpoint, "")?;
        Ok(Self {
            http: http_client(SERVICE, timeout)?,
            endpoint,
            key: key.into(),
            region: region.into(),
        })
    }

    /// Languages available as translation targets, keyed by language code.
    pub async fn supported_languages(&self) -> Result<BTreeMap<String, LanguageInfo>, ServiceError> {
        let mut url = endpoint_url(&self.endpoint, "languages")?;
        url.query_pairs_mut()
            .append_pair("api-version", API_VERSION)
            .append_pair("scope", "translation");

        tracing::debug!(%url, "fetching supported languages");
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ServiceError::http(SERVICE, e))?;
        let result: LanguagesResult = read_json(SERVICE, resp).await?;
        Ok(result.translation)
    }

    /// Translate `text` into `target`, letting the service detect the source.
    pub async fn translate(&self, target: &str, text: &str) -> Result<TextTranslation, ServiceError> {
        let mut url = endpoint_url(&self.endpoint, "translate")?;
        url.query_pairs_mut()
            .append_pair("api-version", API_VERSION)
            .append_pair("to", target);

        tracing::debug!(%url, "translating text");
        let mut request = self
            .http
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .json(&json!([{ "text": text }]));
        if !self.region.is_empty() {
            request = request.header(SUBSCRIPTION_REGION_HEADER, &self.region);
        }
        let resp = request
            .send()
            .await
            .map_err(|e| ServiceError::http(SERVICE, e))?;

        let items: Vec<TextTranslation> = read_json(SERVICE, resp).await?;
        items.into_iter().next().ok_or_else(|| ServiceError::Reported {
            service: SERVICE,
            message: "empty translation response".to_string(),
        })
    }
}

impl CognitiveService for TranslatorClient {
    const NAME: &'static str = "Translator";
    const REQUIRED_SETTINGS: &'static [&'static str] =
        &["translator.endpoint", "translator.key", "translator.region"];

    fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        Ok(Self::new(
            settings.require("translator.endpoint")?,
            settings.require("translator.key")?,
            settings.require("translator.region")?,
            settings.timeout(),
        )?)
    }
}

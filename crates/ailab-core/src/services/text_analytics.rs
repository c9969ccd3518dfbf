//! Text analytics: language, sentiment, key phrases, entities, linked entities.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{
    endpoint_url, http_client, read_json, CognitiveService, ErrorDetail, SUBSCRIPTION_KEY_HEADER,
};
use crate::error::{CoreError, ServiceError};
use crate::storage::Settings;

const SERVICE: &str = "text analytics";
const API_VERSION: &str = "2023-04-01";

/// Client for the synchronous `:analyze-text` endpoint. Each call analyzes
/// a single document.
pub struct TextAnalyticsClient {
    http: Client,
    endpoint: String,
    key: String,
}

#[derive(Debug, Deserialize)]
struct AnalyzeTextResponse<D> {
    results: AnalyzeTextResults<D>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeTextResults<D> {
    #[serde(default = "Vec::new")]
    documents: Vec<D>,
    #[serde(default)]
    errors: Vec<DocumentError>,
}

#[derive(Debug, Deserialize)]
struct DocumentError {
    #[serde(default)]
    id: String,
    error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLanguage {
    pub name: String,
    #[serde(default)]
    pub iso6391_name: String,
    #[serde(default)]
    pub confidence_score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LanguageDocument {
    detected_language: DetectedLanguage,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentScores {
    #[serde(default)]
    pub positive: f64,
    #[serde(default)]
    pub neutral: f64,
    #[serde(default)]
    pub negative: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSentiment {
    /// `positive`, `neutral`, `negative` or `mixed`.
    pub sentiment: String,
    #[serde(default)]
    pub confidence_scores: SentimentScores,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyPhraseDocument {
    #[serde(default)]
    key_phrases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedEntity {
    pub text: String,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub confidence_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedEntity {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub data_source: String,
}

#[derive(Debug, Deserialize)]
struct EntityDocument<E> {
    #[serde(default = "Vec::new")]
    entities: Vec<E>,
}

/// Everything the text-analysis sample prints for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnalysis {
    pub language: DetectedLanguage,
    pub sentiment: DocumentSentiment,
    pub key_phrases: Vec<String>,
    pub entities: Vec<CategorizedEntity>,
    pub linked_entities: Vec<LinkedEntity>,
}

impl TextAnalyticsClient {
    pub fn new(
        endpoint: impl Into<String>,
        key: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, ServiceError> {
        let endpoint = endpoint.into();
        endpoint_url(&endpoint, "")?;
        Ok(Self {
            http: http_client(SERVICE, timeout)?,
            endpoint,
            key: key.into(),
        })
    }

    /// Run one analysis `kind` over `text` and return its single document.
    async fn analyze<D: DeserializeOwned>(&self, kind: &str, text: &str) -> Result<D, ServiceError> {
        let mut url = endpoint_url(&self.endpoint, "language/:analyze-text")?;
        url.query_pairs_mut().append_pair("api-version", API_VERSION);

        let body = json!({
            "kind": kind,
            "analysisInput": {
                "documents": [{ "id": "1", "text": text }]
            },
        });

        tracing::debug!(kind, %url, "analyzing text");
        let resp = self
            .http
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::http(SERVICE, e))?;

        let parsed: AnalyzeTextResponse<D> = read_json(SERVICE, resp).await?;
        let AnalyzeTextResults { documents, errors } = parsed.results;
        if let Some(document) = documents.into_iter().next() {
            return Ok(document);
        }
        let message = errors
            .into_iter()
            .next()
            .map(|e| format!("document {}: {}", e.id, e.error))
            .unwrap_or_else(|| format!("{kind} returned no documents"));
        Err(ServiceError::Reported {
            service: SERVICE,
            message,
        })
    }

    pub async fn detect_language(&self, text: &str) -> Result<DetectedLanguage, ServiceError> {
        let doc: LanguageDocument = self.analyze("LanguageDetection", text).await?;
        Ok(doc.detected_language)
    }

    pub async fn analyze_sentiment(&self, text: &str) -> Result<DocumentSentiment, ServiceError> {
        self.analyze("SentimentAnalysis", text).await
    }

    pub async fn extract_key_phrases(&self, text: &str) -> Result<Vec<String>, ServiceError> {
        let doc: KeyPhraseDocument = self.analyze("KeyPhraseExtraction", text).await?;
        Ok(doc.key_phrases)
    }

    pub async fn recognize_entities(
        &self,
        text: &str,
    ) -> Result<Vec<CategorizedEntity>, ServiceError> {
        let doc: EntityDocument<CategorizedEntity> =
            self.analyze("EntityRecognition", text).await?;
        Ok(doc.entities)
    }

    pub async fn recognize_linked_entities(
        &self,
        text: &str,
    ) -> Result<Vec<LinkedEntity>, ServiceError> {
        let doc: EntityDocument<LinkedEntity> = self.analyze("EntityLinking", text).await?;
        Ok(doc.entities)
    }

    /// All five analyses, in the order the sample prints them.
    pub async fn analyze_document(&self, text: &str) -> Result<DocumentAnalysis, ServiceError> {
        Ok(DocumentAnalysis {
            language: self.detect_language(text).await?,
            sentiment: self.analyze_sentiment(text).await?,
            key_phrases: self.extract_key_phrases(text).await?,
            entities: self.recognize_entities(text).await?,
            linked_entities: self.recognize_linked_entities(text).await?,
        })
    }
}

impl CognitiveService for TextAnalyticsClient {
    const NAME: &'static str = "Text analytics";
    const REQUIRED_SETTINGS: &'static [&'static str] = &["language.endpoint", "language.key"];

    fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        Ok(Self::new(
            settings.require("language.endpoint")?,
            settings.require("language.key")?,
            settings.timeout(),
        )?)
    }
}

//! Conversational language understanding (the clock model's recognizer).

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{endpoint_url, http_client, read_json, CognitiveService, SUBSCRIPTION_KEY_HEADER};
use crate::clock::{DetailedRecognition, Entity, IntentRecognizer, RecognitionResult};
use crate::error::{CoreError, ServiceError};
use crate::storage::Settings;

const SERVICE: &str = "conversation analysis";
const API_VERSION: &str = "2023-04-01";

/// Client for the `:analyze-conversations` endpoint.
pub struct ConversationClient {
    http: Client,
    endpoint: String,
    key: String,
    project: String,
    deployment: String,
}

/// Top-level response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeConversationResponse {
    #[serde(default)]
    pub kind: String,
    pub result: ConversationTaskResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTaskResult {
    #[serde(default)]
    pub query: String,
    pub prediction: ConversationPrediction,
}

/// The model's verdict for one utterance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationPrediction {
    #[serde(default)]
    pub top_intent: Option<String>,
    #[serde(default)]
    pub project_kind: String,
    #[serde(default)]
    pub intents: Vec<IntentScore>,
    #[serde(default)]
    pub entities: Vec<PredictedEntity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentScore {
    pub category: String,
    #[serde(default)]
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictedEntity {
    pub category: String,
    pub text: String,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub length: usize,
    #[serde(default)]
    pub confidence_score: f64,
}

impl From<ConversationPrediction> for RecognitionResult {
    /// The result's confidence is that of the intent named by `topIntent`;
    /// if it is not listed, the first (highest-ranked) intent's score is
    /// used, and 0 when there are no intents at all.
    fn from(prediction: ConversationPrediction) -> Self {
        let top_intent = prediction.top_intent.unwrap_or_default();
        let confidence_score = prediction
            .intents
            .iter()
            .find(|intent| intent.category == top_intent)
            .or_else(|| prediction.intents.first())
            .map(|intent| intent.confidence_score)
            .unwrap_or(0.0);
        let entities = prediction
            .entities
            .into_iter()
            .map(|entity| Entity {
                category: entity.category,
                text: entity.text,
                confidence_score: entity.confidence_score,
            })
            .collect();

        RecognitionResult {
            top_intent,
            confidence_score,
            entities,
        }
    }
}

impl ConversationClient {
    pub fn new(
        endpoint: impl Into<String>,
        key: impl Into<String>,
        project: impl Into<String>,
        deployment: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, ServiceError> {
        let endpoint = endpoint.into();
        endpoint_url(&endpoint, "")?;
        Ok(Self {
            http: http_client(SERVICE, timeout)?,
            endpoint,
            key: key.into(),
            project: project.into(),
            deployment: deployment.into(),
        })
    }

    /// Send one utterance to the deployed model.
    pub async fn analyze(&self, text: &str) -> Result<AnalyzeConversationResponse, ServiceError> {
        let mut url = endpoint_url(&self.endpoint, "language/:analyze-conversations")?;
        url.query_pairs_mut().append_pair("api-version", API_VERSION);

        let body = json!({
            "kind": "Conversation",
            "analysisInput": {
                "conversationItem": {
                    "id": "1",
                    "participantId": "1",
                    "text": text,
                }
            },
            "parameters": {
                "projectName": self.project,
                "deploymentName": self.deployment,
                "stringIndexType": "Utf16CodeUnit",
            },
        });

        tracing::debug!(%url, project = %self.project, "analyzing conversation");
        let resp = self
            .http
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::http(SERVICE, e))?;

        read_json(SERVICE, resp).await
    }
}

impl IntentRecognizer for ConversationClient {
    async fn recognize(&self, utterance: &str) -> Result<RecognitionResult, ServiceError> {
        let response = self.analyze(utterance).await?;
        Ok(response.result.prediction.into())
    }

    /// The raw value is the whole response: kind, query and every scored
    /// intent and entity.
    async fn recognize_detailed(&self, utterance: &str) -> Result<DetailedRecognition, ServiceError> {
        let response = self.analyze(utterance).await?;
        let raw = serde_json::to_value(&response)
            .map_err(|source| ServiceError::Malformed { service: SERVICE, source })?;
        Ok(DetailedRecognition {
            result: response.result.prediction.into(),
            raw,
        })
    }
}

impl CognitiveService for ConversationClient {
    const NAME: &'static str = "Conversational language understanding";
    const REQUIRED_SETTINGS: &'static [&'static str] = &[
        "language.endpoint",
        "language.key",
        "conversation.project",
        "conversation.deployment",
    ];

    fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        Ok(Self::new(
            settings.require("language.endpoint")?,
            settings.require("language.key")?,
            settings.require("conversation.project")?,
            settings.require("conversation.deployment")?,
            settings.timeout(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(json: &str) -> ConversationPrediction {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn confidence_follows_top_intent() {
        let result: RecognitionResult = prediction(
            r#"{"topIntent":"GetDay","projectKind":"Conversation",
                "intents":[{"category":"GetTime","confidenceScore":0.3},
                           {"category":"GetDay","confidenceScore":0.6}],
                "entities":[]}"#,
        )
        .into();
        assert_eq!(result.top_intent, "GetDay");
        assert_eq!(result.confidence_score, 0.6);
    }

    #[test]
    fn missing_top_intent_gives_empty_label() {
        let result: RecognitionResult = prediction(r#"{"intents":[]}"#).into();
        assert_eq!(result.top_intent, "");
        assert_eq!(result.confidence_score, 0.0);
        assert!(result.entities.is_empty());
    }

    #[test]
    fn entities_keep_order() {
        let result: RecognitionResult = prediction(
            r#"{"topIntent":"GetTime",
                "intents":[{"category":"GetTime","confidenceScore":0.9}],
                "entities":[
                  {"category":"Location","text":"London","offset":20,"length":6,"confidenceScore":1},
                  {"category":"Location","text":"Tokyo","offset":31,"length":5,"confidenceScore":1}]}"#,
        )
        .into();
        let texts: Vec<_> = result.entities.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, ["London", "Tokyo"]);
    }
}

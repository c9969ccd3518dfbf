//! Custom question answering against a deployed knowledge base.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{endpoint_url, http_client, read_json, CognitiveService, SUBSCRIPTION_KEY_HEADER};
use crate::error::{CoreError, ServiceError};
use crate::storage::Settings;

const SERVICE: &str = "question answering";
const API_VERSION: &str = "2021-10-01";

pub struct QuestionAnsweringClient {
    http: Client,
    endpoint: String,
    key: String,
    project: String,
    deployment: String,
}

/// One candidate answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseAnswer {
    pub answer: String,
    #[serde(default)]
    pub confidence_score: f64,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AnswersResult {
    #[serde(default)]
    answers: Vec<KnowledgeBaseAnswer>,
}

impl QuestionAnsweringClient {
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

    /// Ask the knowledge base a question; answers come back best first.
    pub async fn get_answers(&self, question: &str) -> Result<Vec<KnowledgeBaseAnswer>, ServiceError> {
        let mut url = endpoint_url(&self.endpoint, "language/:query-knowledgebases")?;
        url.query_pairs_mut()
            .append_pair("projectName", &self.project)
            .append_pair("deploymentName", &self.deployment)
            .append_pair("api-version", API_VERSION);

        tracing::debug!(%url, "querying knowledge base");
        let resp = self
            .http
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .json(&json!({ "question": question }))
            .send()
            .await
            .map_err(|e| ServiceError::http(SERVICE, e))?;

        let result: AnswersResult = read_json(SERVICE, resp).await?;
        Ok(result.answers)
    }
}

impl CognitiveService for QuestionAnsweringClient {
    const NAME: &'static str = "Question answering";
    const REQUIRED_SETTINGS: &'static [&'static str] = &[
        "language.endpoint",
        "language.key",
        "question_answering.project",
        "question_answering.deployment",
    ];

    fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        Ok(Self::new(
            settings.require("language.endpoint")?,
            settings.require("language.key")?,
            settings.require("question_answering.project")?,
            settings.require("question_answering.deployment")?,
            settings.timeout(),
        )?)
    }
}

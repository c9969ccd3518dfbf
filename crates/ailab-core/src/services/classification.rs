//! Custom single-label text classification.
//!
//! Classification runs as an asynchronous job: the documents are submitted
//! in one batch, the service answers with an `operation-location` URL, and
//! the client polls that URL until the job settles.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use super::{
    endpoint_url, http_client, read_json, status_error, CognitiveService, ErrorDetail,
    SUBSCRIPTION_KEY_HEADER,
};
use crate::error::{CoreError, ServiceError};
use crate::storage::Settings;

const SERVICE: &str = "text classification";
const API_VERSION: &str = "2023-04-01";
const OPERATION_LOCATION: &str = "operation-location";

pub struct ClassificationClient {
    http: Client,
    endpoint: String,
    key: String,
    project: String,
    deployment: String,
    poll_interval: Duration,
    max_polls: u32,
}

/// A predicted class and its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassCategory {
    pub category: String,
    #[serde(default)]
    pub confidence_score: f64,
}

/// What happened to one submitted document.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Classified(Vec<ClassCategory>),
    Failed(ErrorDetail),
}

/// Result for the document at `index` in the submitted batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentClassification {
    pub index: usize,
    pub outcome: ClassificationOutcome,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobState {
    status: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
    #[serde(default)]
    tasks: JobTasks,
}

#[derive(Debug, Default, Deserialize)]
struct JobTasks {
    #[serde(default)]
    items: Vec<TaskItem>,
}

#[derive(Debug, Deserialize)]
struct TaskItem {
    #[serde(default)]
    results: Option<TaskResults>,
}

#[derive(Debug, Deserialize)]
struct TaskResults {
    #[serde(default)]
    documents: Vec<ClassifiedDocument>,
    #[serde(default)]
    errors: Vec<DocumentFailure>,
}

#[derive(Debug, Deserialize)]
struct ClassifiedDocument {
    id: String,
    #[serde(default, rename = "class")]
    classes: Vec<ClassCategory>,
}

#[derive(Debug, Deserialize)]
struct DocumentFailure {
    id: String,
    error: ErrorDetail,
}

/// Where the job stands after one poll.
enum Poll {
    Pending,
    Done(Vec<DocumentClassification>),
}

impl ClassificationClient {
    pub fn new(
        endpoint: impl Into<String>,
        key: impl Into<String>,
        project: impl Into<String>,
        deployment: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let endpoint = endpoint.into();
        endpoint_url(&endpoint, "")?;
        Ok(Self {
            http: http_client(SERVICE, timeout)?,
            endpoint,
            key: key.into(),
            project: project.into(),
            deployment: deployment.into(),
            poll_interval: Duration::from_secs(1),
            max_polls: 120,
        })
    }

    /// Override the polling cadence (interval between polls, poll budget).
    pub fn with_polling(mut self, poll_interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_polls = max_polls.max(1);
        self
    }

    /// Submit the batch and return the URL to poll.
    async fn submit(&self, documents: &[String]) -> Result<String, ServiceError> {
        let mut url = endpoint_url(&self.endpoint, "language/analyze-text/jobs")?;
        url.query_pairs_mut().append_pair("api-version", API_VERSION);

        let docs: Vec<_> = documents
            .iter()
            .enumerate()
            .map(|(i, text)| json!({ "id": (i + 1).to_string(), "language": "en", "text": text }))
            .collect();
        let body = json!({
            "displayName": "Classify documents",
            "analysisInput": { "documents": docs },
            "tasks": [{
                "kind": "CustomSingleLabelClassification",
                "taskName": "Single Classification",
                "parameters": {
                    "projectName": self.project,
                    "deploymentName": self.deployment,
                },
            }],
        });

        tracing::debug!(%url, documents = documents.len(), "submitting classification job");
        let resp = self
            .http
            .post(url)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::http(SERVICE, e))?;

        let status = resp.status();
        let location = resp
            .headers()
            .get(OPERATION_LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if !status.is_success() {
            let body = read_text_lossy(resp).await;
            return Err(status_error(SERVICE, status.as_u16(), &body));
        }
        location.ok_or(ServiceError::MissingHeader {
            service: SERVICE,
            header: OPERATION_LOCATION,
        })
    }

    async fn poll(&self, location: &str, batch_len: usize) -> Result<Poll, ServiceError> {
        let resp = self
            .http
            .get(location)
            .header(SUBSCRIPTION_KEY_HEADER, &self.key)
            .send()
            .await
            .map_err(|e| ServiceError::http(SERVICE, e))?;
        let state: JobState = read_json(SERVICE, resp).await?;

        match state.status.as_str() {
            "notStarted" | "running" | "cancelling" => Ok(Poll::Pending),
            "succeeded" => Ok(Poll::Done(collect_results(state.tasks, batch_len))),
            other => Err(ServiceError::JobFailed {
                service: SERVICE,
                status: other.to_string(),
                message: state
                    .errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            }),
        }
    }

    /// Classify every document in `documents`, returning one entry per
    /// document in input order. Per-document failures are reported in the
    /// entry's outcome rather than failing the whole batch.
    pub async fn classify(
        &self,
        documents: &[String],
    ) -> Result<Vec<DocumentClassification>, ServiceError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let location = self.submit(documents).await?;

        for attempt in 1..=self.max_polls {
            match self.poll(&location, documents.len()).await? {
                Poll::Done(results) => return Ok(results),
                Poll::Pending => {
                    tracing::info!(attempt, "classification job still running");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
        Err(ServiceError::JobTimeout {
            service: SERVICE,
            polls: self.max_polls,
        })
    }
}

async fn read_text_lossy(resp: reqwest::Response) -> String {
    resp.text().await.unwrap_or_default()
}

/// Map task results back onto batch positions via the `1..=n` document ids.
fn collect_results(tasks: JobTasks, batch_len: usize) -> Vec<DocumentClassification> {
    let mut outcomes: Vec<Option<ClassificationOutcome>> = vec![None; batch_len];
    let slot = |id: &str| {
        id.parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .filter(|i| *i < batch_len)
    };

    for results in tasks.items.into_iter().filter_map(|item| item.results) {
        for doc in results.documents {
            if let Some(i) = slot(&doc.id) {
                outcomes[i] = Some(ClassificationOutcome::Classified(doc.classes));
            }
        }
        for failure in results.errors {
            tracing::warn!(document = %failure.id, error = %failure.error, "document failed");
            if let Some(i) = slot(&failure.id) {
                outcomes[i] = Some(ClassificationOutcome::Failed(failure.error));
            }
        }
    }

    outcomes
        .into_iter()
        .enumerate()
        .map(|(index, outcome)| DocumentClassification {
            index,
            outcome: outcome.unwrap_or_else(|| {
                ClassificationOutcome::Failed(ErrorDetail {
                    code: "MissingResult".to_string(),
                    message: "the service returned no result for this document".to_string(),
                })
            }),
        })
        .collect()
}

impl CognitiveService for ClassificationClient {
    const NAME: &'static str = "Custom text classification";
    const REQUIRED_SETTINGS: &'static [&'static str] = &[
        "language.endpoint",
        "language.key",
        "classification.project",
        "classification.deployment",
    ];

    fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        let client = Self::new(
            settings.require("language.endpoint")?,
            settings.require("language.key")?,
            settings.require("classification.project")?,
            settings.require("classification.deployment")?,
            settings.timeout(),
        )?;
        Ok(client.with_polling(settings.poll_interval(), settings.http.max_polls))
    }
}

//! Typed recognizer output consumed by the dispatcher.

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::ServiceError;

/// Entity categories the clock intents care about. Matching is exact and
/// case-sensitive; every other category is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    Location,
    Date,
    Weekday,
}

impl EntityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityCategory::Location => "Location",
            EntityCategory::Date => "Date",
            EntityCategory::Weekday => "Weekday",
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        self.as_str() == category
    }
}

impl std::fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled span extracted from an utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub category: String,
    pub text: String,
    #[serde(default)]
    pub confidence_score: f64,
}

impl Entity {
    pub fn new(category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            text: text.into(),
            confidence_score: 1.0,
        }
    }
}

/// What the recognizer made of one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    pub top_intent: String,
    pub confidence_score: f64,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl RecognitionResult {
    pub fn new(top_intent: impl Into<String>, confidence_score: f64) -> Self {
        Self {
            top_intent: top_intent.into(),
            confidence_score,
            entities: Vec::new(),
        }
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    /// Text of the last entity in `category`.
    ///
    /// Later entities overwrite earlier ones: with two `Location` entities
    /// the second one wins.
    pub fn last_entity(&self, category: EntityCategory) -> Option<&str> {
        self.entities
            .iter()
            .rev()
            .find(|entity| category.matches(&entity.category))
            .map(|entity| entity.text.as_str())
    }
}

/// A recognition plus the recognizer's full response, for display.
#[derive(Debug, Clone)]
pub struct DetailedRecognition {
    pub result: RecognitionResult,
    pub raw: serde_json::Value,
}

/// Turns raw text into a [`RecognitionResult`].
///
/// Implemented by the conversation-analysis client; tests substitute
/// canned recognizers.
pub trait IntentRecognizer: Sync {
    fn recognize(
        &self,
        utterance: &str,
    ) -> impl Future<Output = Result<RecognitionResult, ServiceError>> + Send;

    /// Recognize and keep the full response. Recognizers without a richer
    /// response report the typed result itself.
    fn recognize_detailed(
        &self,
        utterance: &str,
    ) -> impl Future<Output = Result<DetailedRecognition, ServiceError>> + Send {
        async move {
            let result = self.recognize(utterance).await?;
            let raw = serde_json::to_value(&result).map_err(|source| ServiceError::Malformed {
                service: "recognizer",
                source,
            })?;
            Ok(DetailedRecognition { result, raw })
        }
    }
}

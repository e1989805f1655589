//! Rating collaborator — scores one candidate text against a job description.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::llm_client::{LlmClient, LlmError};
use crate::matching::prompts::{rate_prompt, rate_system};

/// Loosely-typed rating reply. Every key is optional; `score` is kept as raw
/// JSON so the engine can coerce numbers and numeric strings alike.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingResponse {
    pub score: Option<Value>,
    pub justification: Option<String>,
    pub raw: Option<String>,
    pub matches: Option<Vec<String>>,
    pub recommendation: Option<String>,
}

impl RatingResponse {
    /// A reply that could not be read as JSON; carried as `raw` text only.
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            raw: Some(text.into()),
            ..Default::default()
        }
    }
}

/// Carried in `AppState` as `Arc<dyn CandidateRater>`.
#[async_trait]
pub trait CandidateRater: Send + Sync {
    async fn rate(
        &self,
        candidate_text: &str,
        job_description: &str,
    ) -> Result<RatingResponse, LlmError>;
}

/// Rater backed by Claude.
pub struct LlmRater {
    llm: LlmClient,
}

impl LlmRater {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl CandidateRater for LlmRater {
    async fn rate(
        &self,
        candidate_text: &str,
        job_description: &str,
    ) -> Result<RatingResponse, LlmError> {
        let prompt = rate_prompt(candidate_text, job_description);
        let text = self.llm.call_text(&prompt, &rate_system()).await?;
        Ok(parse_rating(&text))
    }
}

/// Reads the model reply as a rating object, falling back to raw text.
///
/// Keys are read one by one so a badly typed field never hides the score.
pub fn parse_rating(text: &str) -> RatingResponse {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => RatingResponse {
            score: object.get("score").cloned(),
            justification: text_field(&object, "justification"),
            raw: text_field(&object, "raw"),
            matches: object.get("matches").and_then(match_list),
            recommendation: text_field(&object, "recommendation"),
        },
        _ => RatingResponse::raw(text),
    }
}

/// Strings as-is, other scalars and structures as their JSON text.
fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn match_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect(),
        ),
        Value::String(s) if !s.trim().is_empty() => Some(vec![s.clone()]),
        _ => None,
    }
}

//! Matching Engine — rates every stored record against one job description.
//!
//! Calls are sequential, one per record, in store order. A failing call only
//! zeroes that record's result; the batch always completes.

use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::LlmError;
use crate::matching::rater::{CandidateRater, RatingResponse};
use crate::models::candidate::CandidateRecord;

/// Characters of résumé text sent when a record has no skills section.
pub const CANDIDATE_TEXT_LIMIT: usize = 2000;

/// One rated candidate. Built per request, never persisted.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub record: CandidateRecord,
    pub score: f64,
    pub justification: String,
    pub matches: Vec<String>,
    pub recommendation: String,
}

impl MatchResult {
    fn from_rating(record: CandidateRecord, rating: RatingResponse) -> Result<Self, LlmError> {
        let score = coerce_score(rating.score.as_ref())?;
        Ok(Self {
            record,
            score,
            justification: rating.justification.or(rating.raw).unwrap_or_default(),
            matches: rating.matches.unwrap_or_default(),
            recommendation: rating.recommendation.unwrap_or_default(),
        })
    }

    fn from_error(record: CandidateRecord, error: &LlmError) -> Self {
        Self {
            record,
            score: 0.0,
            justification: format!("LLM error: {error}"),
            matches: Vec::new(),
            recommendation: String::new(),
        }
    }
}

/// Rates `records` against `job_description` and returns them best-first.
///
/// A blank job description is rejected before any rating call is made. Ties
/// keep store order.
pub async fn match_candidates(
    records: Vec<CandidateRecord>,
    job_description: &str,
    rater: &dyn CandidateRater,
) -> Result<Vec<MatchResult>, AppError> {
    let job_description = job_description.trim();
    if job_description.is_empty() {
        return Err(AppError::EmptyInput);
    }

    info!(candidates = records.len(), "Matching candidates against job description");

    let mut results = Vec::with_capacity(records.len());
    for record in records {
        let text = candidate_text(&record);
        let outcome = match rater.rate(&text, job_description).await {
            Ok(rating) => MatchResult::from_rating(record.clone(), rating),
            Err(e) => Err(e),
        };
        let result = outcome.unwrap_or_else(|e| {
            warn!(id = %record.id, "Rating failed: {e}");
            MatchResult::from_error(record, &e)
        });
        results.push(result);
    }

    // sort_by is stable, so equal scores stay in store order.
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(results)
}

/// `skills_section` when present and non-empty, else the head of the full text.
pub fn candidate_text(record: &CandidateRecord) -> String {
    match record.skills_section.as_deref() {
        Some(section) if !section.is_empty() => section.to_string(),
        _ => record.text.chars().take(CANDIDATE_TEXT_LIMIT).collect(),
    }
}

/// Absent → 0.0; finite numbers and numeric strings → f64; booleans → 1.0/0.0.
/// A present `null`, a non-finite value, or anything else is a failed rating.
pub fn coerce_score(value: Option<&Value>) -> Result<f64, LlmError> {
    let Some(value) = value else {
        return Ok(0.0);
    };
    let score = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    score
        .filter(|s| s.is_finite())
        .ok_or_else(|| LlmError::InvalidScore(value.to_string()))
}

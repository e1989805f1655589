//! Test doubles shared by unit tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::llm_client::LlmError;
use crate::matching::rater::{CandidateRater, RatingResponse};
use crate::parsing::{ParseError, ParsedResume, ResumeParser};

pub enum Reply {
    Rating(RatingResponse),
    Fail(String),
}

impl Reply {
    pub fn score(score: f64) -> Self {
        Reply::Rating(RatingResponse {
            score: Some(json!(score)),
            justification: Some(format!("scored {score}")),
            ..Default::default()
        })
    }
}

/// Returns queued replies in order; zero scores once the queue is empty.
pub struct ScriptedRater {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedRater {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CandidateRater for ScriptedRater {
    async fn rate(
        &self,
        candidate_text: &str,
        job_description: &str,
    ) -> Result<RatingResponse, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((candidate_text.to_string(), job_description.to_string()));
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Rating(rating)) => Ok(rating),
            Some(Reply::Fail(message)) => Err(LlmError::Api {
                status: 500,
                message,
            }),
            None => Ok(RatingResponse::default()),
        }
    }
}

/// Parser that always fails, as a corrupt upload would.
pub struct FailingParser;

#[async_trait]
impl ResumeParser for FailingParser {
    async fn parse(&self, _path: &Path, _extension: &str) -> Result<ParsedResume, ParseError> {
        Err(ParseError::Pdf("corrupt xref table".to_string()))
    }
}

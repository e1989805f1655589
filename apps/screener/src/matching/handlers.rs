//! Axum route handlers for the match form and results.

use axum::{extract::State, response::Response, Form};
use serde::Deserialize;

use crate::errors::AppError;
use crate::flash::IncomingFlash;
use crate::matching::engine::match_candidates;
use crate::state::AppState;
use crate::views::{self, MatchFormPage, MatchResultsPage};

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub job_description: String,
}

/// GET /match
pub async fn match_form(mut incoming: IncomingFlash) -> Result<Response, AppError> {
    let page = MatchFormPage {
        flash: incoming.take(),
    };
    views::render(page, incoming)
}

/// POST /match
///
/// Rates every stored candidate. A blank job description redirects back to the
/// form before any rating call.
pub async fn handle_match(
    State(state): State<AppState>,
    incoming: IncomingFlash,
    Form(request): Form<MatchRequest>,
) -> Result<Response, AppError> {
    let job_description = request.job_description.trim();
    let records = state.store.read_all().await?;
    let results = match match_candidates(records, job_description, state.rater.as_ref()).await {
        Ok(results) => results,
        Err(e) => return e.recover(&state.flash_key),
    };

    let page = MatchResultsPage {
        flash: None,
        job_description: job_description.to_string(),
        results,
    };
    views::render(page, incoming)
}

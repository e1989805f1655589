//! Askama page templates. Each page carries the pending flash, if any.

use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::errors::AppError;
use crate::flash::{Flash, IncomingFlash};
use crate::matching::engine::MatchResult;
use crate::models::candidate::CandidateRecord;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadPage {
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "candidates.html")]
pub struct CandidatesPage {
    pub flash: Option<Flash>,
    pub records: Vec<CandidateRecord>,
}

#[derive(Template)]
#[template(path = "candidate.html")]
pub struct CandidatePage {
    pub flash: Option<Flash>,
    pub record: CandidateRecord,
}

#[derive(Template)]
#[template(path = "match_form.html")]
pub struct MatchFormPage {
    pub flash: Option<Flash>,
}

#[derive(Template)]
#[template(path = "match_results.html")]
pub struct MatchResultsPage {
    pub flash: Option<Flash>,
    pub job_description: String,
    pub results: Vec<MatchResult>,
}

/// Renders `page` as HTML and clears the flash cookie it consumed.
pub fn render<T: Template>(page: T, incoming: IncomingFlash) -> Result<Response, AppError> {
    let html = page.render()?;
    Ok(incoming.settle(Html(html).into_response()))
}

//! Axum route handlers for upload, listing and detail pages.

use axum::{
    extract::{Multipart, Path, State},
    response::Response,
};

use crate::candidates::upload::{ingest_upload, read_resume_field};
use crate::errors::AppError;
use crate::flash::{self, Flash, IncomingFlash};
use crate::state::AppState;
use crate::views::{self, CandidatePage, CandidatesPage, UploadPage};

/// GET /upload
pub async fn upload_form(mut incoming: IncomingFlash) -> Result<Response, AppError> {
    let page = UploadPage {
        flash: incoming.take(),
    };
    views::render(page, incoming)
}

/// POST /upload
///
/// Validation and parse failures redirect back to the form with a flash;
/// success redirects to the candidate list.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let outcome = match read_resume_field(&mut multipart).await {
        Ok(upload) => {
            ingest_upload(
                &state.store,
                state.parser.as_ref(),
                &state.config.upload_dir,
                upload,
            )
            .await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(_) => Ok(flash::redirect(
            "/candidates",
            &Flash::success("Uploaded & parsed."),
            &state.flash_key,
        )),
        Err(e) => e.recover(&state.flash_key),
    }
}

/// GET /candidates
pub async fn list_candidates(
    State(state): State<AppState>,
    mut incoming: IncomingFlash,
) -> Result<Response, AppError> {
    let records = state.store.read_all().await?;
    let page = CandidatesPage {
        flash: incoming.take(),
        records,
    };
    views::render(page, incoming)
}

/// GET /candidate/:id
pub async fn candidate_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut incoming: IncomingFlash,
) -> Result<Response, AppError> {
    let record = match state.store.get_by_id(&id).await? {
        Some(record) => record,
        None => return AppError::CandidateNotFound(id).recover(&state.flash_key),
    };
    let page = CandidatePage {
        flash: incoming.take(),
        record,
    };
    views::render(page, incoming)
}

pub mod health;

use axum::{extract::DefaultBodyLimit, response::Response, routing::get, Router};

use crate::candidates::handlers as candidates;
use crate::errors::AppError;
use crate::flash::IncomingFlash;
use crate::matching::handlers as matching;
use crate::state::AppState;
use crate::views::{self, IndexPage};

/// GET /
async fn index(mut incoming: IncomingFlash) -> Result<Response, AppError> {
    let page = IndexPage {
        flash: incoming.take(),
    };
    views::render(page, incoming)
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/", get(index))
        .route(
            "/upload",
            get(candidates::upload_form).post(candidates::handle_upload),
        )
        .route("/candidates", get(candidates::list_candidates))
        .route("/candidate/:id", get(candidates::candidate_detail))
        .route(
            "/match",
            get(matching::match_form).post(matching::handle_match),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

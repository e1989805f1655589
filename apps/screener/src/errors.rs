use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::flash::{self, Flash, FlashKey};
use crate::store::StoreError;

/// Application-level error type.
///
/// The user-input variants are recovered by the handlers as a redirect with a
/// flash (`recover`); everything else becomes a JSON error response.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NoFile(&'static str),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Provide job description.")]
    EmptyInput,

    #[error("Candidate not found")]
    CandidateNotFound(String),

    #[error("Could not parse résumé: {0}")]
    ParseFailed(String),

    #[error("Malformed upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Where to send the user, and what to tell them, for recoverable errors.
    pub fn recovery(&self) -> Option<(&'static str, Flash)> {
        let message = self.to_string();
        match self {
            AppError::NoFile(_) | AppError::UnsupportedType(_) | AppError::ParseFailed(_) => {
                Some(("/upload", Flash::danger(message)))
            }
            AppError::Multipart(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Some(("/upload", Flash::danger("File too large")))
            }
            AppError::Multipart(_) => Some(("/upload", Flash::danger(message))),
            AppError::EmptyInput => Some(("/match", Flash::warning(message))),
            AppError::CandidateNotFound(_) => Some(("/candidates", Flash::danger(message))),
            _ => None,
        }
    }

    /// Turns a recoverable error into a redirect-with-flash; passes the rest through.
    pub fn recover(self, key: &FlashKey) -> Result<Response, AppError> {
        match self.recovery() {
            Some((to, notice)) => Ok(flash::redirect(to, &notice, key)),
            None => Err(self),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NoFile(msg) => (StatusCode::BAD_REQUEST, "NO_FILE", msg.to_string()),
            AppError::UnsupportedType(_) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_TYPE",
                self.to_string(),
            ),
            AppError::EmptyInput => (StatusCode::BAD_REQUEST, "EMPTY_INPUT", self.to_string()),
            AppError::CandidateNotFound(id) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("Candidate {id} not found"),
            ),
            AppError::ParseFailed(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "PARSE_FAILED",
                self.to_string(),
            ),
            AppError::Multipart(e) => (e.status(), "MALFORMED_UPLOAD", e.body_text()),
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    "A file system error occurred".to_string(),
                )
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TEMPLATE_ERROR",
                    "A rendering error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::FlashLevel;

    #[test]
    fn test_recoverable_errors_map_to_pages() {
        let (to, notice) = AppError::NoFile("No file part").recovery().unwrap();
        assert_eq!(to, "/upload");
        assert_eq!(notice.level, FlashLevel::Danger);
        assert_eq!(notice.message, "No file part");

        let (to, notice) = AppError::EmptyInput.recovery().unwrap();
        assert_eq!(to, "/match");
        assert_eq!(notice.level, FlashLevel::Warning);
        assert_eq!(notice.message, "Provide job description.");

        let (to, notice) = AppError::CandidateNotFound("9".into()).recovery().unwrap();
        assert_eq!(to, "/candidates");
        assert_eq!(notice.message, "Candidate not found");
    }

    #[test]
    fn test_internal_errors_are_not_recovered() {
        let err = AppError::Io(std::io::Error::other("disk full"));
        assert!(err.recovery().is_none());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

//! Résumé parsing — text extraction plus heuristic field extraction.
//!
//! The upload flow only sees the `ResumeParser` trait; `HeuristicParser` is the
//! implementation wired in at startup.

pub mod extract;
pub mod fields;

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Fields extracted from one résumé. Every scalar field is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Vec<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("unsupported extension '{0}'")]
    UnsupportedExtension(String),

    #[error("document contains no extractable text")]
    EmptyText,

    #[error("text extraction aborted: {0}")]
    Aborted(String),
}

#[async_trait]
pub trait ResumeParser: Send + Sync {
    /// Parses the file at `path`. `extension` is lowercase and has no dot.
    async fn parse(&self, path: &Path, extension: &str) -> Result<ParsedResume, ParseError>;
}

/// Regex/heading based parser. Deterministic, no network.
pub struct HeuristicParser;

#[async_trait]
impl ResumeParser for HeuristicParser {
    async fn parse(&self, path: &Path, extension: &str) -> Result<ParsedResume, ParseError> {
        let bytes = tokio::fs::read(path).await?;
        let extension = extension.to_string();
        run_blocking(move || {
            let text = extract::extract_text(&bytes, &extension)?;
            if text.trim().is_empty() {
                return Err(ParseError::EmptyText);
            }
            Ok(fields::extract_fields(&text))
        })
        .await
    }
}

/// Runs CPU-bound extraction off the async workers. A panic inside the
/// extractor (malformed PDFs can trigger one) becomes `ParseError::Aborted`.
async fn run_blocking<T, F>(work: F) -> Result<T, ParseError>
where
    F: FnOnce() -> Result<T, ParseError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ParseError::Aborted(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parse_txt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ada.txt");
        std::fs::write(
            &path,
            "Ada Lovelace\nada@example.com\n\nSkills\nRust, Python, SQL\n",
        )
        .unwrap();

        let parsed = HeuristicParser.parse(&path, "txt").await.unwrap();
        assert_eq!(parsed.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(parsed.email.as_deref(), Some("ada@example.com"));
        assert_eq!(parsed.skills, vec!["Rust", "Python", "SQL"]);
        assert!(parsed.text.unwrap().contains("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_parse_empty_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "   \n\n").unwrap();

        let err = HeuristicParser.parse(&path, "txt").await.unwrap_err();
        assert!(matches!(err, ParseError::EmptyText));
    }

    #[tokio::test]
    async fn test_extractor_panic_becomes_parse_error() {
        let err = run_blocking::<ParsedResume, _>(|| panic!("bad xref offset"))
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::Aborted(_)));
        assert!(err.to_string().starts_with("text extraction aborted"));
    }

    #[tokio::test]
    async fn test_parse_invalid_docx_is_docx_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.docx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        let err = HeuristicParser.parse(&path, "docx").await.unwrap_err();
        assert!(matches!(err, ParseError::Docx(_)));
    }

    #[tokio::test]
    async fn test_parse_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = HeuristicParser
            .parse(&dir.path().join("nope.pdf"), "pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, ParseError::Io(_)));
    }
}

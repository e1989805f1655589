//! Upload Handler — validates the uploaded file, saves it, parses it and
//! appends the resulting record.

use std::path::Path;

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::{info, warn};
use unicode_normalization::UnicodeNormalization;

use crate::errors::AppError;
use crate::models::candidate::CandidateRecord;
use crate::parsing::ResumeParser;
use crate::store::RecordStore;

/// Multipart field carrying the résumé.
pub const RESUME_FIELD: &str = "resume";
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "txt"];

#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Pulls the `resume` part out of the form. Other parts are skipped.
pub async fn read_resume_field(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(AppError::NoFile("No selected file"));
        }
        let data = field.bytes().await?;
        return Ok(UploadedFile { filename, data });
    }
    Err(AppError::NoFile("No file part"))
}

/// Saves, parses and records one upload. Nothing is appended unless parsing succeeds.
pub async fn ingest_upload(
    store: &RecordStore,
    parser: &dyn ResumeParser,
    upload_dir: &Path,
    upload: UploadedFile,
) -> Result<CandidateRecord, AppError> {
    if allowed_extension(&upload.filename).is_none() {
        return Err(AppError::UnsupportedType(upload.filename));
    }
    let filename = sanitize_filename(&upload.filename);
    let extension =
        allowed_extension(&filename).ok_or_else(|| AppError::UnsupportedType(upload.filename))?;

    let path = upload_dir.join(&filename);
    tokio::fs::write(&path, &upload.data).await?;
    info!(file = %filename, bytes = upload.data.len(), "Saved upload");

    let parsed = match parser.parse(&path, &extension).await {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(file = %filename, "Résumé parsing failed: {e}");
            if let Err(rm) = tokio::fs::remove_file(&path).await {
                warn!(file = %filename, "Could not remove unparsed upload: {rm}");
            }
            return Err(AppError::ParseFailed(e.to_string()));
        }
    };

    let id = store.next_id().await?;
    let record = CandidateRecord::from_parsed(id, filename, parsed);
    store.append(&record).await?;
    info!(id = %record.id, name = %record.name, "Recorded candidate");

    Ok(record)
}

/// Lowercased extension if it is one we accept.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Reduces a client-supplied filename to a safe basename: NFKD-decomposed then
/// ASCII only, path separators and whitespace become `_`, only
/// `[A-Za-z0-9_.-]` survive, and leading/trailing `.`/`_` are trimmed.
pub fn sanitize_filename(filename: &str) -> String {
    let spaced: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

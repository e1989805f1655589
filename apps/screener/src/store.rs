//! Record Store — append-only CSV table of candidate records.
//!
//! There is no locking: concurrent appends may interleave, and two uploads racing
//! on `next_id` can receive the same id.

use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::models::candidate::CandidateRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Handle to the flat file. Cheap to clone; every call goes back to disk.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row, writing the header first when the file is absent or empty.
    pub async fn append(&self, record: &CandidateRecord) -> Result<(), StoreError> {
        let write_header = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        let mut writer = WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(Vec::new());
        writer.serialize(record)?;
        let row = writer.into_inner().map_err(|e| e.into_error())?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&row).await?;
        file.flush().await?;

        debug!(id = %record.id, path = %self.path.display(), "Appended candidate record");
        Ok(())
    }

    /// All records in file order. A missing file is an empty store.
    pub async fn read_all(&self) -> Result<Vec<CandidateRecord>, StoreError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(data.as_slice());

        // Short rows are padded so missing trailing columns read as empty.
        let headers = reader.headers()?.clone();
        let mut records = Vec::new();
        for row in reader.records() {
            let mut row = row?;
            while row.len() < headers.len() {
                row.push_field("");
            }
            records.push(row.deserialize::<CandidateRecord>(Some(&headers))?);
        }
        Ok(records)
    }

    /// First record whose id matches exactly, or `None`.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<CandidateRecord>, StoreError> {
        Ok(self.read_all().await?.into_iter().find(|r| r.id == id))
    }

    /// Id for the next record: current row count plus one.
    pub async fn next_id(&self) -> Result<String, StoreError> {
        Ok((self.read_all().await?.len() + 1).to_string())
    }
}

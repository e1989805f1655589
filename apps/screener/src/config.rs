use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_SECRET_KEY: &str = "change-me";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub upload_dir: PathBuf,
    pub records_path: PathBuf,
    pub secret_key: String,
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            upload_dir: env_or("UPLOAD_FOLDER", "uploads").into(),
            records_path: env_or("RECORDS_PATH", "resumes.csv").into(),
            secret_key: env_or("SECRET_KEY", DEFAULT_SECRET_KEY),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

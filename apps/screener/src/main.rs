mod candidates;
mod config;
mod errors;
mod flash;
mod llm_client;
mod matching;
mod models;
mod parsing;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod testing;
mod views;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::flash::FlashKey;
use crate::llm_client::LlmClient;
use crate::matching::rater::LlmRater;
use crate::parsing::HeuristicParser;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::RecordStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{pkg}={level},tower_http={level}",
                pkg = env!("CARGO_PKG_NAME"),
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume screener v{}", env!("CARGO_PKG_VERSION"));

    if config.uses_default_secret() {
        warn!("SECRET_KEY is not set; flash cookies are signed with the default key");
    }

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("creating upload dir {}", config.upload_dir.display()))?;
    info!("Upload directory: {}", config.upload_dir.display());

    let store = RecordStore::new(config.records_path.clone());
    info!("Record store: {}", store.path().display());

    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    if llm.has_api_key() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("ANTHROPIC_API_KEY is not set; every rating will report an LLM error");
    }

    let state = AppState {
        store,
        parser: Arc::new(HeuristicParser),
        rater: Arc::new(LlmRater::new(llm)),
        flash_key: FlashKey::new(&config.secret_key),
        config: config.clone(),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

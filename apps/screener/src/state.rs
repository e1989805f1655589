use std::sync::Arc;

use crate::config::Config;
use crate::flash::FlashKey;
use crate::matching::rater::CandidateRater;
use crate::parsing::ResumeParser;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: RecordStore,
    /// Pluggable résumé parser. Default: HeuristicParser.
    pub parser: Arc<dyn ResumeParser>,
    /// Pluggable rating collaborator. Default: LlmRater.
    pub rater: Arc<dyn CandidateRater>,
    pub flash_key: FlashKey,
    pub config: Config,
}

// Matching: rates every stored candidate against a job description.
// All LLM calls go through llm_client via the CandidateRater trait.

pub mod engine;
pub mod handlers;
pub mod prompts;
pub mod rater;

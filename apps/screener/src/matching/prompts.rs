use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// System prompt for candidate rating. Followed by `JSON_ONLY_SYSTEM`.
const RATE_ROLE: &str = "You are an experienced technical recruiter. \
    You rate how well a candidate fits a job description, strictly from the evidence given.";

/// Rating instructions. `rate_prompt` appends the job description and candidate text.
const RATE_INSTRUCTIONS: &str = r#"Rate how well the candidate matches the job description.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 7.5,
  "justification": "Two or three sentences explaining the score.",
  "matches": ["Rust", "PostgreSQL"],
  "recommendation": "interview"
}

Rules:
- score is a number from 0 to 10. 0 means no overlap, 10 means every requirement is evidenced.
- matches lists requirements from the job description that the candidate text supports.
- recommendation is one of "interview", "maybe", "reject".
- Judge only from the candidate text. Do not assume skills that are not written down."#;

pub fn rate_system() -> String {
    format!("{RATE_ROLE} {JSON_ONLY_SYSTEM}")
}

pub fn rate_prompt(candidate_text: &str, job_description: &str) -> String {
    format!(
        "{RATE_INSTRUCTIONS}\n\nJOB DESCRIPTION:\n{job_description}\n\nCANDIDATE:\n{candidate_text}"
    )
}

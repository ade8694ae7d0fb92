//! Builds the analysis prompt and performs the single completion call for
//! one resume.

use thiserror::Error;

use crate::analysis::prompts::{ANALYSIS_PROMPT_TEMPLATE, GENERAL_EVALUATION};
use crate::llm_client::LlmClient;
use crate::models::report::ScreeningCriteria;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no resume text left after extraction and cleanup")]
    EmptyInput,

    #[error("analysis request failed: {0}")]
    RequestFailed(String),
}

/// Renders the criteria block of the prompt: one labeled line per non-empty
/// skill list, or the fixed general-evaluation phrase when both are empty.
pub fn criteria_description(criteria: &ScreeningCriteria) -> String {
    let mut parts = Vec::new();
    if !criteria.technical_skills.is_empty() {
        parts.push(format!(
            "Technical Skills: {}",
            criteria.technical_skills.join(", ")
        ));
    }
    if !criteria.soft_skills.is_empty() {
        parts.push(format!("Soft Skills: {}", criteria.soft_skills.join(", ")));
    }

    if parts.is_empty() {
        GENERAL_EVALUATION.to_string()
    } else {
        parts.join("\n")
    }
}

/// Sends one resume for analysis and returns the model's raw reply.
///
/// Exactly one attempt — a transport or endpoint failure becomes a
/// `RequestFailed` the caller records against this document alone.
pub async fn request_analysis(
    llm: &LlmClient,
    resume_text: &str,
    criteria: &ScreeningCriteria,
) -> Result<String, AnalysisError> {
    if resume_text.trim().is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let prompt = ANALYSIS_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{criteria}", &criteria_description(criteria));

    llm.complete(&prompt)
        .await
        .map_err(|e| AnalysisError::RequestFailed(e.to_string()))
}

//! LLM review of a resume against a posting, grounded on the keyword gaps.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::resume::fit_scoring::FitReport;
use crate::resume::prompts::{FEEDBACK_PROMPT_TEMPLATE, FEEDBACK_SYSTEM};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeFeedback {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub summary: String,
}

pub fn build_feedback_prompt(resume_text: &str, posting_text: &str, report: &FitReport) -> String {
    let gaps = if report.gaps.is_empty() {
        "(none)".to_string()
    } else {
        report
            .gaps
            .iter()
            .map(|g| format!("- {}", g.keyword))
            .collect::<Vec<_>>()
            .join("\n")
    };

    FEEDBACK_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{gaps}", &gaps)
        .replace("{posting_text}", posting_text)
        .replace("{resume_text}", resume_text)
}

pub async fn review_resume(
    llm: &LlmClient,
    resume_text: &str,
    posting_text: &str,
    report: &FitReport,
) -> Result<ResumeFeedback, AppError> {
    let prompt = build_feedback_prompt(resume_text, posting_text, report);
    llm.call_json::<ResumeFeedback>(&prompt, FEEDBACK_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume review failed: {e}")))
}

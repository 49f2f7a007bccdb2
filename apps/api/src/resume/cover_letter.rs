//! Cover letter generation calibrated to the posting's tone.

use serde::Serialize;

use crate::errors::AppError;
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::resume::posting_parser::{ParsedPosting, PostingTone};
use crate::resume::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM};
use crate::resume::tone::get_tone_examples;

#[derive(Debug, Clone, Serialize)]
pub struct CoverLetter {
    pub cover_letter: String,
    pub tone: PostingTone,
    pub word_count: usize,
}

pub struct CoverLetterInput<'a> {
    pub resume_text: &'a str,
    pub posting_text: &'a str,
    pub company: &'a str,
    pub candidate_name: Option<&'a str>,
    pub parsed: &'a ParsedPosting,
    pub tone_override: Option<PostingTone>,
}

pub fn build_cover_letter_prompt(input: &CoverLetterInput<'_>) -> (String, PostingTone) {
    let tone = input.tone_override.unwrap_or(input.parsed.detected_tone);
    let tone_json =
        serde_json::to_string_pretty(&get_tone_examples(tone)).unwrap_or_else(|_| "{}".to_string());

    let requirements: Vec<String> = input
        .parsed
        .hard_requirements
        .iter()
        .filter(|r| r.is_required)
        .take(5)
        .map(|r| format!("- {}", r.text))
        .collect();
    let requirements = if requirements.is_empty() {
        "- (use the posting text)".to_string()
    } else {
        requirements.join("\n")
    };

    let candidate = input
        .candidate_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("the candidate");

    let prompt = COVER_LETTER_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{tone_json}", &tone_json)
        .replace("{candidate_name}", candidate)
        .replace("{company}", input.company)
        .replace("{requirements}", &requirements)
        .replace("{posting_text}", input.posting_text)
        .replace("{resume_text}", input.resume_text);

    (prompt, tone)
}

pub async fn generate_cover_letter(
    llm: &LlmClient,
    input: &CoverLetterInput<'_>,
) -> Result<CoverLetter, AppError> {
    let (prompt, tone) = build_cover_letter_prompt(input);
    let text = llm
        .call_text(&prompt, COVER_LETTER_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Cover letter generation failed: {e}")))?;

    Ok(CoverLetter {
        word_count: text.split_whitespace().count(),
        cover_letter: text,
        tone,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::posting_parser::Requirement;

    fn parsed(tone: PostingTone) -> ParsedPosting {
        ParsedPosting {
            hard_requirements: vec![
                Requirement {
                    text: "Portfolio of shipped mobile work".to_string(),
                    is_required: true,
                },
                Requirement {
                    text: "Framer".to_string(),
                    is_required: false,
                },
            ],
            soft_signals: vec![],
            seniority: "senior".to_string(),
            keyword_inventory: vec![],
            detected_tone: tone,
        }
    }

    #[test]
    fn test_prompt_uses_detected_tone() {
        let p = parsed(PostingTone::CraftFocused);
        let input = CoverLetterInput {
            resume_text: "resume",
            posting_text: "posting",
            company: "Linear",
            candidate_name: Some("Sam Rivera"),
            parsed: &p,
            tone_override: None,
        };
        let (prompt, tone) = build_cover_letter_prompt(&input);
        assert_eq!(tone, PostingTone::CraftFocused);
        assert!(prompt.contains("\"Crafted\""));
        assert!(prompt.contains("from Sam Rivera for the role below at Linear"));
        assert!(prompt.contains("- Portfolio of shipped mobile work"));
        assert!(!prompt.contains("- Framer"));
    }

    #[test]
    fn test_tone_override_wins_and_name_defaults() {
        let p = parsed(PostingTone::CraftFocused);
        let input = CoverLetterInput {
            resume_text: "resume",
            posting_text: "posting",
            company: "Linear",
            candidate_name: Some("  "),
            parsed: &p,
            tone_override: Some(PostingTone::FastPaced),
        };
        let (prompt, tone) = build_cover_letter_prompt(&input);
        assert_eq!(tone, PostingTone::FastPaced);
        assert!(prompt.contains("\"Shipped\""));
        assert!(prompt.contains("from the candidate"));
    }
}

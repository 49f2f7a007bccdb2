//! Posting parser: extracts structured requirements, keywords and tone from a
//! raw design job posting.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::resume::prompts::{POSTING_PARSE_PROMPT_TEMPLATE, POSTING_PARSE_SYSTEM};

/// Detected tone of a posting. Drives verb selection in cover letters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostingTone {
    FastPaced,
    #[default]
    Collaborative,
    ResearchDriven,
    CraftFocused,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub text: String,
    pub is_required: bool,
}

/// A keyword from the posting, weighted by position and frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub frequency: u32,
    /// title=1.0, requirements=0.8, responsibilities=0.6, about=0.3
    pub position_weight: f32,
    /// frequency * position_weight
    pub weighted_score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedPosting {
    #[serde(default)]
    pub hard_requirements: Vec<Requirement>,
    #[serde(default)]
    pub soft_signals: Vec<String>,
    #[serde(default = "unknown_seniority")]
    pub seniority: String,
    #[serde(default)]
    pub keyword_inventory: Vec<KeywordEntry>,
    #[serde(default)]
    pub detected_tone: PostingTone,
}

fn unknown_seniority() -> String {
    "unknown".to_string()
}

/// Postings longer than this are cut before parsing.
const MAX_POSTING_CHARS: usize = 12_000;

pub async fn parse_posting(posting_text: &str, llm: &LlmClient) -> Result<ParsedPosting, AppError> {
    let text: String = posting_text.chars().take(MAX_POSTING_CHARS).collect();
    let prompt = POSTING_PARSE_PROMPT_TEMPLATE.replace("{posting_text}", &text);
    let mut parsed = llm
        .call_json::<ParsedPosting>(&prompt, POSTING_PARSE_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Posting parsing failed: {e}")))?;

    // the model's arithmetic is not trusted
    for entry in &mut parsed.keyword_inventory {
        entry.weighted_score = entry.frequency as f32 * entry.position_weight;
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_tone_serde() {
        let tone: PostingTone = serde_json::from_str(r#""CraftFocused""#).unwrap();
        assert_eq!(tone, PostingTone::CraftFocused);
        let tone: PostingTone = serde_json::from_str(r#""FastPaced""#).unwrap();
        assert_eq!(tone, PostingTone::FastPaced);
    }

    #[test]
    fn test_posting_tone_default_is_collaborative() {
        assert_eq!(PostingTone::default(), PostingTone::Collaborative);
    }

    #[test]
    fn test_parsed_posting_full_deserializes() {
        let json = r#"{
            "hard_requirements": [
                {"text": "5+ years product design", "is_required": true},
                {"text": "Portfolio of shipped work", "is_required": true}
            ],
            "soft_signals": ["Prototyping in Framer"],
            "seniority": "senior",
            "keyword_inventory": [
                {"keyword": "Figma", "frequency": 3, "position_weight": 0.8, "weighted_score": 2.4},
                {"keyword": "design systems", "frequency": 2, "position_weight": 0.6, "weighted_score": 1.2}
            ],
            "detected_tone": "CraftFocused"
        }"#;
        let parsed: ParsedPosting = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.hard_requirements.len(), 2);
        assert_eq!(parsed.keyword_inventory[1].keyword, "design systems");
        assert_eq!(parsed.detected_tone, PostingTone::CraftFocused);
        assert_eq!(parsed.seniority, "senior");
    }

    #[test]
    fn test_parsed_posting_tolerates_missing_fields() {
        let parsed: ParsedPosting = serde_json::from_str(r#"{"keyword_inventory": []}"#).unwrap();
        assert_eq!(parsed.seniority, "unknown");
        assert_eq!(parsed.detected_tone, PostingTone::Collaborative);
        assert!(parsed.hard_requirements.is_empty());
    }
}

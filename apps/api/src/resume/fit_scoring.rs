//! Fit scoring: a pluggable scorer that measures a resume against a parsed posting.
//!
//! Default: `KeywordResumeScorer` (pure Rust, deterministic, no LLM call).
//! `AppState` holds an `Arc<dyn ResumeScorer>`.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::resume::posting_parser::ParsedPosting;

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitMatch {
    pub keyword: String,
    /// Where in the resume the keyword was found.
    pub evidence: String,
    pub strength: f32, // 0.0 – 1.0
}

/// A posting keyword the resume does not cover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    pub keyword: String,
    pub posting_frequency: u32,
    /// A related skill the resume does list, if any.
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    pub overall_score: u32,              // 0 – 100
    pub strong_matches: Vec<FitMatch>,   // strength ≥ 0.8
    pub partial_matches: Vec<FitMatch>,  // 0.4 – 0.79
    pub gaps: Vec<Gap>,                  // strength < 0.4
    pub recommendation: String,
    pub scorer_backend: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching the handlers.
#[async_trait]
pub trait ResumeScorer: Send + Sync {
    async fn score(&self, resume_text: &str, posting: &ParsedPosting)
        -> Result<FitReport, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordResumeScorer
// ────────────────────────────────────────────────────────────────────────────

/// Keyword-based scorer.
///
/// Algorithm:
/// 1. Detect the resume's skills from a fixed design vocabulary.
/// 2. For each keyword in ParsedPosting.keyword_inventory:
///    - keyword is a detected skill → strength 1.0
///    - keyword appears anywhere in the resume text → strength 0.6
///    - otherwise → 0.0
/// 3. overall_score = Σ(strength × weighted_score) / Σ(weighted_score) × 100
/// 4. Classify: strong (≥0.8), partial (0.4–0.79), gap (<0.4)
pub struct KeywordResumeScorer;

#[async_trait]
impl ResumeScorer for KeywordResumeScorer {
    async fn score(
        &self,
        resume_text: &str,
        posting: &ParsedPosting,
    ) -> Result<FitReport, AppError> {
        Ok(compute_keyword_fit(resume_text, posting))
    }
}

/// Tools, methods and disciplines recognized as resume skills.
const SKILL_VOCABULARY: &[&str] = &[
    "figma",
    "sketch",
    "adobe xd",
    "photoshop",
    "illustrator",
    "indesign",
    "after effects",
    "premiere",
    "cinema 4d",
    "blender",
    "framer",
    "principle",
    "protopie",
    "webflow",
    "miro",
    "html",
    "css",
    "javascript",
    "react",
    "design systems",
    "design system",
    "prototyping",
    "wireframing",
    "user research",
    "usability testing",
    "interaction design",
    "visual design",
    "information architecture",
    "accessibility",
    "typography",
    "branding",
    "illustration",
    "motion design",
    "animation",
    "ux writing",
    "journey mapping",
    "a/b testing",
    "data visualization",
    "mobile design",
    "design thinking",
];

fn padded(text: &str) -> String {
    let words: Vec<&str> = text
        .split(|c: char| !(c.is_alphanumeric() || c == '/'))
        .filter(|w| !w.is_empty())
        .collect();
    format!(" {} ", words.join(" ").to_lowercase())
}

/// Vocabulary skills that appear in the resume as whole words.
pub fn detect_skills(resume_text: &str) -> HashSet<&'static str> {
    let text = padded(resume_text);
    SKILL_VOCABULARY
        .iter()
        .filter(|skill| text.contains(&format!(" {skill} ")))
        .copied()
        .collect()
}

fn compute_keyword_fit(resume_text: &str, posting: &ParsedPosting) -> FitReport {
    let keywords = &posting.keyword_inventory;

    if keywords.is_empty() {
        return FitReport {
            overall_score: 0,
            strong_matches: vec![],
            partial_matches: vec![],
            gaps: vec![],
            recommendation: "No keywords found in the posting. Cannot score fit.".to_string(),
            scorer_backend: "keyword".to_string(),
        };
    }

    let skills = detect_skills(resume_text);
    let resume_lower = resume_text.to_lowercase();

    let mut strong_matches = Vec::new();
    let mut partial_matches = Vec::new();
    let mut gaps = Vec::new();

    let mut total_weighted = 0.0_f32;
    let mut total_score = 0.0_f32;

    for entry in keywords {
        let keyword = entry.keyword.trim().to_lowercase();
        let weight = entry.weighted_score.max(0.0);
        total_weighted += weight;

        let (strength, evidence) = if skills.contains(keyword.as_str()) {
            (1.0, "skills".to_string())
        } else if !keyword.is_empty() && resume_lower.contains(&keyword) {
            (0.6, "resume text".to_string())
        } else {
            (0.0, String::new())
        };

        total_score += strength * weight;

        let fit_match = FitMatch {
            keyword: entry.keyword.clone(),
            evidence,
            strength,
        };

        if strength >= 0.8 {
            strong_matches.push(fit_match);
        } else if strength >= 0.4 {
            partial_matches.push(fit_match);
        } else {
            gaps.push(Gap {
                keyword: entry.keyword.clone(),
                posting_frequency: entry.frequency,
                suggestion: closest_skill(&skills, &keyword),
            });
        }
    }

    let overall_score = if total_weighted > 0.0 {
        ((total_score / total_weighted) * 100.0).round().min(100.0) as u32
    } else {
        0
    };

    FitReport {
        recommendation: build_recommendation(overall_score, &gaps),
        overall_score,
        strong_matches,
        partial_matches,
        gaps,
        scorer_backend: "keyword".to_string(),
    }
}

/// A detected skill that shares a word with the missing keyword.
fn closest_skill(skills: &HashSet<&'static str>, keyword: &str) -> Option<String> {
    let mut sorted: Vec<&&str> = skills.iter().collect();
    sorted.sort();
    sorted
        .into_iter()
        .find(|skill| {
            skill
                .split(' ')
                .any(|w| w.len() > 3 && keyword.split(' ').any(|k| k == w))
        })
        .map(|s| s.to_string())
}

fn build_recommendation(score: u32, gaps: &[Gap]) -> String {
    let top_gaps: Vec<&str> = gaps.iter().take(3).map(|g| g.keyword.as_str()).collect();

    if score >= 80 {
        "Strong fit. Your resume covers the posting's key requirements.".to_string()
    } else if score >= 60 {
        format!(
            "Moderate fit ({score}/100). Make these more visible if you have them: {}.",
            top_gaps.join(", ")
        )
    } else {
        format!(
            "Low fit ({score}/100). Significant gaps: {}. Tailor your resume before applying.",
            top_gaps.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::posting_parser::{KeywordEntry, PostingTone};

    fn make_posting(keywords: Vec<(&str, u32, f32)>) -> ParsedPosting {
        ParsedPosting {
            hard_requirements: vec![],
            soft_signals: vec![],
            seniority: "senior".to_string(),
            keyword_inventory: keywords
                .into_iter()
                .map(|(kw, freq, pw)| KeywordEntry {
                    keyword: kw.to_string(),
                    frequency: freq,
                    position_weight: pw,
                    weighted_score: freq as f32 * pw,
                })
                .collect(),
            detected_tone: PostingTone::Collaborative,
        }
    }

    const RESUME: &str = "Senior Product Designer. Skills: Figma, Design Systems, Prototyping. \
        Led onboarding redesign that lifted activation 12%. Comfortable with stakeholder workshops.";

    #[test]
    fn test_detect_skills_whole_words() {
        let skills = detect_skills(RESUME);
        assert!(skills.contains("figma"));
        assert!(skills.contains("design systems"));
        assert!(skills.contains("prototyping"));
        assert!(!skills.contains("react"));
    }

    #[test]
    fn test_vocabulary_match_scores_strong() {
        let posting = make_posting(vec![("Figma", 3, 0.8), ("design systems", 2, 0.6)]);
        let report = compute_keyword_fit(RESUME, &posting);
        assert_eq!(report.strong_matches.len(), 2);
        assert_eq!(report.overall_score, 100);
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn test_text_match_scores_partial() {
        let posting = make_posting(vec![("workshops", 2, 0.8)]);
        let report = compute_keyword_fit(RESUME, &posting);
        assert_eq!(report.partial_matches.len(), 1);
        assert_eq!(report.overall_score, 60);
    }

    #[test]
    fn test_no_match_creates_gap_with_suggestion() {
        let posting = make_posting(vec![("design tokens", 1, 1.0)]);
        let report = compute_keyword_fit(RESUME, &posting);
        assert_eq!(report.gaps.len(), 1);
        assert_eq!(report.gaps[0].posting_frequency, 1);
        assert_eq!(report.gaps[0].suggestion.as_deref(), Some("design systems"));
        assert!(report.recommendation.starts_with("Low fit (0/100)"));
    }

    #[test]
    fn test_empty_keywords_returns_zero_score() {
        let report = compute_keyword_fit(RESUME, &make_posting(vec![]));
        assert_eq!(report.overall_score, 0);
        assert_eq!(report.scorer_backend, "keyword");
    }

    #[tokio::test]
    async fn test_scorer_trait_object() {
        let scorer: Box<dyn ResumeScorer> = Box::new(KeywordResumeScorer);
        let report = scorer
            .score(RESUME, &make_posting(vec![("Figma", 1, 1.0), ("After Effects", 1, 1.0)]))
            .await
            .unwrap();
        assert_eq!(report.overall_score, 50);
        assert!(report.recommendation.starts_with("Low fit"));
    }
}

//! Tone calibration: maps the detected posting tone to cover-letter phrasing.

use serde::Serialize;

use crate::resume::posting_parser::PostingTone;

#[derive(Debug, Clone, Serialize)]
pub struct ToneExamples {
    pub strong_verbs: Vec<&'static str>,
    pub opening_style: &'static str,
    pub avoid_phrases: Vec<&'static str>,
}

pub fn get_tone_examples(tone: PostingTone) -> ToneExamples {
    match tone {
        PostingTone::FastPaced => ToneExamples {
            strong_verbs: vec!["Shipped", "Launched", "Owned", "Built", "Drove", "Scaled"],
            opening_style: "lead with the most impressive shipped outcome in one sentence",
            avoid_phrases: vec!["I believe", "I would be honored", "assisted with"],
        },
        PostingTone::Collaborative => ToneExamples {
            strong_verbs: vec![
                "Partnered with",
                "Collaborated on",
                "Facilitated",
                "Aligned",
                "Contributed to",
                "Supported",
            ],
            opening_style: "open with how you work with product and engineering partners",
            avoid_phrases: vec!["single-handedly", "rockstar", "ninja"],
        },
        PostingTone::ResearchDriven => ToneExamples {
            strong_verbs: vec![
                "Investigated",
                "Validated",
                "Synthesized",
                "Tested",
                "Uncovered",
                "Measured",
            ],
            opening_style: "open with an insight you uncovered and what it changed",
            avoid_phrases: vec!["gut feeling", "moved fast", "pixel-perfect"],
        },
        PostingTone::CraftFocused => ToneExamples {
            strong_verbs: vec![
                "Crafted",
                "Refined",
                "Designed",
                "Polished",
                "Elevated",
                "Systematized",
            ],
            opening_style: "open with a piece of work you are proud of and the detail that made it",
            avoid_phrases: vec!["good enough", "quick and dirty", "MVP"],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_paced_includes_shipped() {
        let t = get_tone_examples(PostingTone::FastPaced);
        assert!(t.strong_verbs.contains(&"Shipped"));
    }

    #[test]
    fn test_research_avoids_craft_language() {
        let t = get_tone_examples(PostingTone::ResearchDriven);
        assert!(t.strong_verbs.contains(&"Synthesized"));
        assert!(t.avoid_phrases.contains(&"pixel-perfect"));
    }

    #[test]
    fn test_verb_sets_do_not_overlap_avoid_lists() {
        for tone in [
            PostingTone::FastPaced,
            PostingTone::Collaborative,
            PostingTone::ResearchDriven,
            PostingTone::CraftFocused,
        ] {
            let t = get_tone_examples(tone);
            for verb in &t.strong_verbs {
                assert!(
                    !t.avoid_phrases.iter().any(|a| a.eq_ignore_ascii_case(verb)),
                    "{tone:?} both uses and avoids {verb}"
                );
            }
        }
    }
}

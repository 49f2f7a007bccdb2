// All LLM prompt constants for the resume tooling.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for posting parsing.
pub const POSTING_PARSE_SYSTEM: &str =
    "You are an expert design recruiter. \
    Parse a design job posting and extract structured information. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Posting parse prompt. Replace `{posting_text}` before sending.
pub const POSTING_PARSE_PROMPT_TEMPLATE: &str = r#"Parse the following design job posting and extract structured information.

Return a JSON object with this EXACT schema (no extra fields):
{
  "hard_requirements": [
    {"text": "5+ years of product design experience", "is_required": true}
  ],
  "soft_signals": [
    "Motion design skills a plus"
  ],
  "seniority": "senior",
  "keyword_inventory": [
    {
      "keyword": "Figma",
      "frequency": 3,
      "position_weight": 0.8,
      "weighted_score": 2.4
    }
  ],
  "detected_tone": "Collaborative"
}

Rules for parsing:

POSITION WEIGHTS for keyword scoring:
- Title / header: 1.0
- Requirements section ("Requirements:", "You have:", "What we're looking for:"): 0.8
- Responsibilities section ("You will:", "What you'll do:"): 0.6
- About the company: 0.3
weighted_score = frequency * position_weight

TONE OPTIONS (pick exactly one):
- "FastPaced": startup language - "own", "move fast", "scrappy", "zero to one", "wear many hats"
- "Collaborative": team language - "partner", "collaborate", "cross-functional", "support"
- "ResearchDriven": evidence language - "insights", "research", "validate", "evidence", "study"
- "CraftFocused": quality language - "craft", "pixel-perfect", "polish", "visual excellence", "detail"

HARD REQUIREMENTS: must-haves - "required", "must have", minimum years, portfolio requirements.
SOFT SIGNALS: nice-to-haves - "preferred", "bonus", "nice to have", "plus".

SENIORITY: "entry", "mid", "senior", "lead", or "unknown".

Extract ALL meaningful design keywords (tools, methods, disciplines, deliverables) and score them.

JOB POSTING:
{posting_text}"#;

/// System prompt for resume feedback.
pub const FEEDBACK_SYSTEM: &str = "You are a design hiring manager reviewing a resume \
    against a specific job posting. Be direct and specific. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object.";

/// Feedback prompt.
/// Replace: {grounding_instruction}, {posting_text}, {resume_text}, {gaps}
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Review this resume for the job posting below.

Keywords from the posting that the resume does not mention:
{gaps}

Return a JSON object:
{
  "strengths": ["What in the resume already fits this role, citing the resume"],
  "improvements": ["Specific edits that would make the resume fit better"],
  "summary": "Two or three sentences on overall fit"
}

Give 3 to 5 strengths and 3 to 5 improvements. Improvements may suggest surfacing
experience that is already implied by the resume, never inventing new experience.

JOB POSTING:
{posting_text}

RESUME:
{resume_text}"#;

/// System prompt for cover letters. Plain text output.
pub const COVER_LETTER_SYSTEM: &str = "You are an expert career writer for designers. \
    You write concise, warm, specific cover letters. \
    Respond with the letter text only: no subject line, no markdown, no placeholders in brackets.";

/// Cover letter prompt.
/// Replace: {grounding_instruction}, {tone_json}, {candidate_name}, {company},
///          {posting_text}, {resume_text}, {requirements}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Write a cover letter from {candidate_name} for the role below at {company}.

TONE CALIBRATION (use verbs from strong_verbs, open in the opening_style, never use avoid_phrases):
{tone_json}

Address the most important requirements:
{requirements}

Constraints:
- 250 to 350 words, 3 or 4 paragraphs.
- Refer to concrete projects and outcomes from the resume only.
- End with a short sign-off using the candidate's name.

JOB POSTING:
{posting_text}

RESUME:
{resume_text}"#;

// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps generated content tied to the facts passed in the prompt.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Only state facts that appear in the provided material. \
    Do NOT invent employers, numbers, tools, or achievements. \
    If the material does not support a claim, leave it out.";

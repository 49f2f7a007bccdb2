// LLM prompt constants for the blog pipeline.

/// System prompt for article drafting.
pub const BLOG_SYSTEM: &str = "You are the editor of a job board for remote designers. \
    You write practical, specific articles for product, UX, brand and motion designers \
    looking for remote work. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences around the JSON.";

/// Article prompt. Replace `{grounding_instruction}`, `{topic}` and `{market_snapshot}`.
pub const BLOG_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Write a blog article on this topic:
{topic}

Current listings on the board (use these numbers when discussing the market, and only these):
{market_snapshot}

Return a JSON object with this EXACT schema:
{
  "title": "Headline under 70 characters",
  "excerpt": "One or two sentences for the listing page and meta description",
  "content_markdown": "The full article in Markdown, 800-1200 words, with ## section headings",
  "tags": ["remote-work", "portfolio"]
}

Rules:
- Address the reader directly and give concrete, actionable advice.
- Do not mention that you are an AI or that the numbers came from a prompt.
- 3 to 5 tags, lowercase, hyphenated."#;

/// Used once every topic in the static list has been covered.
pub const TOPIC_PROPOSAL_PROMPT_TEMPLATE: &str = r#"Propose one new blog topic for remote designers looking for work.

Topics already covered (do not repeat or closely paraphrase any of them):
{used_topics}

Return a JSON object: {"topic": "The topic as a single sentence"}"#;

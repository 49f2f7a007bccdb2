//! Blog content generation: pick a topic, ground it on live board numbers,
//! draft with the LLM, validate, store.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::blog::prompts::{BLOG_PROMPT_TEMPLATE, BLOG_SYSTEM, TOPIC_PROPOSAL_PROMPT_TEMPLATE};
use crate::blog::topics::{
    next_topic, reading_minutes, slugify, truncate_chars, unique_slug, word_count,
};
use crate::errors::AppError;
use crate::jobs::repository::{job_stats, JobStats};
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::blog::BlogPostRow;

pub const MIN_WORDS: usize = 300;
pub const MAX_EXCERPT_CHARS: usize = 300;
const MAX_TAGS: usize = 5;

#[derive(Debug, Clone, Deserialize)]
pub struct BlogDraft {
    pub title: String,
    pub excerpt: String,
    pub content_markdown: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TopicProposal {
    topic: String,
}

/// Checks an LLM draft and tidies it for storage.
pub fn validate_draft(draft: BlogDraft) -> Result<BlogDraft, AppError> {
    let title = draft.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::Llm("Draft has no title".to_string()));
    }

    let content = draft.content_markdown.trim().to_string();
    let words = word_count(&content);
    if words < MIN_WORDS {
        return Err(AppError::Llm(format!(
            "Draft too short: {words} words, need at least {MIN_WORDS}"
        )));
    }

    let excerpt = match draft.excerpt.trim() {
        "" => content.lines().find(|l| !l.trim().is_empty() && !l.starts_with('#')).unwrap_or(""),
        e => e,
    };
    let excerpt = truncate_chars(excerpt.trim(), MAX_EXCERPT_CHARS);

    let mut tags: Vec<String> = Vec::new();
    for tag in draft.tags {
        let tag = slugify(&tag);
        if tag != "post" && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags.truncate(MAX_TAGS);

    Ok(BlogDraft {
        title,
        excerpt,
        content_markdown: content,
        tags,
    })
}

/// Plain-text summary of the board used to ground the article.
pub fn market_snapshot(stats: &JobStats) -> String {
    let mut lines = vec![format!(
        "Total open remote design jobs: {} ({} link directly to the employer)",
        stats.total, stats.direct
    )];
    let section = |name: &str, rows: &[crate::jobs::repository::CountRow]| {
        let parts: Vec<String> = rows
            .iter()
            .map(|r| format!("{}: {}", r.key.replace('_', " "), r.count))
            .collect();
        format!("{name}: {}", parts.join(", "))
    };
    lines.push(section("By category", &stats.by_category));
    lines.push(section("By region", &stats.by_region));
    lines.push(section("By job type", &stats.by_job_type));
    lines.join("\n")
}

async fn choose_topic(pool: &PgPool, llm: &LlmClient) -> Result<String, AppError> {
    let used: Vec<String> = sqlx::query_scalar("SELECT topic FROM blog_posts")
        .fetch_all(pool)
        .await?;

    if let Some(topic) = next_topic(&used) {
        return Ok(topic.to_string());
    }

    let prompt = TOPIC_PROPOSAL_PROMPT_TEMPLATE.replace("{used_topics}", &used.join("\n"));
    let proposal: TopicProposal = llm
        .call_json(&prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Topic proposal failed: {e}")))?;

    let topic = proposal.topic.trim().to_string();
    if topic.is_empty() {
        return Err(AppError::Llm("LLM proposed an empty topic".to_string()));
    }
    Ok(topic)
}

/// Runs the whole pipeline and returns the stored post.
pub async fn generate_post(pool: &PgPool, llm: &LlmClient) -> Result<BlogPostRow, AppError> {
    let topic = choose_topic(pool, llm).await?;
    info!("Generating blog post: {topic}");

    let stats = job_stats(pool).await?;
    let prompt = BLOG_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{topic}", &topic)
        .replace("{market_snapshot}", &market_snapshot(&stats));

    let draft: BlogDraft = llm
        .call_json(&prompt, BLOG_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Blog drafting failed: {e}")))?;
    let draft = validate_draft(draft)?;

    let base = slugify(&draft.title);
    let taken: Vec<String> =
        sqlx::query_scalar("SELECT slug FROM blog_posts WHERE slug = $1 OR slug LIKE $2")
            .bind(&base)
            .bind(format!("{base}-%"))
            .fetch_all(pool)
            .await?;
    let slug = unique_slug(&base, &taken);
    let minutes = reading_minutes(word_count(&draft.content_markdown));

    let post = sqlx::query_as::<_, BlogPostRow>(
        r#"
        INSERT INTO blog_posts (slug, title, excerpt, content, tags, topic, reading_minutes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&slug)
    .bind(&draft.title)
    .bind(&draft.excerpt)
    .bind(&draft.content_markdown)
    .bind(&draft.tags)
    .bind(&topic)
    .bind(minutes)
    .fetch_one(pool)
    .await?;

    info!("Published blog post {} ({} min read)", post.slug, post.reading_minutes);
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::repository::CountRow;

    fn draft(words: usize) -> BlogDraft {
        BlogDraft {
            title: "  Remote Design Salaries  ".to_string(),
            excerpt: String::new(),
            content_markdown: format!("## Intro\n{}", "pay ".repeat(words)),
            tags: vec!["Remote Work".to_string(), "remote-work".to_string(), "!!".to_string()],
        }
    }

    #[test]
    fn test_validate_draft_rejects_short_body() {
        assert!(matches!(validate_draft(draft(50)), Err(AppError::Llm(_))));
    }

    #[test]
    fn test_validate_draft_tidies_fields() {
        let d = validate_draft(draft(400)).unwrap();
        assert_eq!(d.title, "Remote Design Salaries");
        // excerpt falls back to the first non-heading line
        assert!(d.excerpt.starts_with("pay pay"));
        assert!(d.excerpt.chars().count() <= MAX_EXCERPT_CHARS);
        assert_eq!(d.tags, vec!["remote-work".to_string()]);
    }

    #[test]
    fn test_validate_draft_requires_title() {
        let mut d = draft(400);
        d.title = " ".to_string();
        assert!(validate_draft(d).is_err());
    }

    #[test]
    fn test_draft_deserializes_without_tags() {
        let json = r#"{"title": "T", "excerpt": "E", "content_markdown": "Body"}"#;
        let d: BlogDraft = serde_json::from_str(json).unwrap();
        assert!(d.tags.is_empty());
    }

    #[test]
    fn test_market_snapshot_lists_sections() {
        let stats = JobStats {
            total: 42,
            direct: 30,
            by_category: vec![CountRow {
                key: "product_design".to_string(),
                count: 20,
            }],
            by_region: vec![CountRow {
                key: "europe".to_string(),
                count: 12,
            }],
            by_job_type: vec![],
        };
        let snapshot = market_snapshot(&stats);
        assert!(snapshot.contains("Total open remote design jobs: 42 (30 link directly"));
        assert!(snapshot.contains("By category: product design: 20"));
        assert!(snapshot.contains("By region: europe: 12"));
        assert!(snapshot.ends_with("By job type: "));
    }
}

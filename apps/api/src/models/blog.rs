use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogPostRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub tags: Vec<String>,
    pub topic: String,
    pub reading_minutes: i32,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Listing view without the markdown body.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlogPostSummary {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub reading_minutes: i32,
    pub published_at: DateTime<Utc>,
}

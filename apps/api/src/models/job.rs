use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub company_logo: Option<String>,
    pub location: Option<String>,
    pub region: String,
    pub job_type: String,
    pub experience_level: String,
    pub category: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_currency: Option<String>,
    pub description: String,
    pub apply_url: String,
    pub source: String,
    pub source_id: Option<String>,
    pub is_direct: bool,
    pub is_featured: bool,
    pub tweeted_at: Option<DateTime<Utc>>,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The subset of a stored job that sync planning and duplicate cleanup compare against.
#[derive(Debug, Clone, FromRow)]
pub struct ExistingJob {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub apply_url: String,
    pub source: String,
    pub is_direct: bool,
    pub is_featured: bool,
    pub posted_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A normalized job ready for INSERT. `apply_url` is always canonical.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub company_logo: Option<String>,
    pub location: Option<String>,
    pub region: String,
    pub job_type: String,
    pub experience_level: String,
    pub category: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_currency: Option<String>,
    pub description: String,
    pub apply_url: String,
    pub source: String,
    pub source_id: Option<String>,
    pub is_direct: bool,
    pub posted_at: DateTime<Utc>,
}

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::alerts::digest::DigestReport;
use crate::cron::tasks::{self, ExpiryRun, SyncRun};
use crate::errors::AppError;
use crate::jobs::cleanup::CleanupReport;
use crate::models::blog::BlogPostRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SyncQuery {
    /// Restricts the run to one source key, e.g. `lever:netlify`.
    pub source: Option<String>,
}

/// POST /api/cron/sync-jobs
pub async fn handle_sync_jobs(
    State(state): State<AppState>,
    Query(params): Query<SyncQuery>,
) -> Result<Json<SyncRun>, AppError> {
    Ok(Json(tasks::run_sync(&state, params.source.as_deref()).await?))
}

/// POST /api/cron/cleanup-duplicates
pub async fn handle_cleanup_duplicates(
    State(state): State<AppState>,
) -> Result<Json<CleanupReport>, AppError> {
    Ok(Json(tasks::run_cleanup(&state).await?))
}

/// POST /api/cron/expire-jobs
pub async fn handle_expire_jobs(State(state): State<AppState>) -> Result<Json<ExpiryRun>, AppError> {
    Ok(Json(tasks::run_expiry(&state).await?))
}

/// POST /api/cron/generate-blog
pub async fn handle_generate_blog(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<BlogPostRow>), AppError> {
    let post = tasks::run_blog(&state).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// POST /api/cron/send-digest
pub async fn handle_send_digest(
    State(state): State<AppState>,
) -> Result<Json<DigestReport>, AppError> {
    Ok(Json(tasks::run_digest(&state).await?))
}

/// POST /api/cron/tweet-jobs
pub async fn handle_tweet_jobs(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let body = match tasks::run_tweets(&state).await? {
        Some(report) => json!({ "enabled": true, "report": report }),
        None => json!({ "enabled": false }),
    };
    Ok(Json(body))
}

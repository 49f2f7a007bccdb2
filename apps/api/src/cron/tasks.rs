use serde::Serialize;
use tracing::{info, warn};

use crate::alerts::digest::{send_digests, DigestReport};
use crate::blog::pipeline::generate_post;
use crate::errors::AppError;
use crate::jobs::cleanup::{cleanup_duplicates, CleanupReport};
use crate::jobs::repository::expire_old_jobs;
use crate::jobs::sync::{sync_all, sync_source, SyncReport};
use crate::models::blog::BlogPostRow;
use crate::seo::cache::invalidate_pages;
use crate::social::twitter::{tweet_new_jobs, TweetReport};
use crate::sources::registry::all_sources;
use crate::state::AppState;

pub const TWEETS_PER_RUN: i64 = 10;

#[derive(Debug, Serialize)]
pub struct SyncRun {
    pub sources: Vec<SyncReport>,
    pub inserted: u64,
    pub deleted: u64,
    pub failed_sources: usize,
    /// None when cleanup failed; the sync itself still counts.
    pub cleanup: Option<CleanupReport>,
}

#[derive(Debug, Serialize)]
pub struct ExpiryRun {
    pub max_age_days: i64,
    pub expired: u64,
}

/// Syncs every source (or just `only`), collapses cross-source duplicates,
/// then drops cached pages.
pub async fn run_sync(state: &AppState, only: Option<&str>) -> Result<SyncRun, AppError> {
    let sources = all_sources();
    let reports = match only {
        Some(name) => {
            let source = sources
                .iter()
                .find(|s| s.name() == name)
                .ok_or_else(|| AppError::NotFound(format!("Unknown source '{name}'")))?;
            vec![sync_source(&state.db, &state.http, source.as_ref()).await]
        }
        None => sync_all(&state.db, &state.http, &sources).await,
    };

    let cleanup = match cleanup_duplicates(&state.db).await {
        Ok(report) => Some(report),
        Err(e) => {
            warn!("Duplicate cleanup after sync failed: {e:#}");
            None
        }
    };
    invalidate_pages(&state.redis).await;

    Ok(SyncRun {
        inserted: reports.iter().map(|r| r.inserted).sum(),
        deleted: reports.iter().map(|r| r.deleted).sum(),
        failed_sources: reports.iter().filter(|r| r.error.is_some()).count(),
        sources: reports,
        cleanup,
    })
}

pub async fn run_cleanup(state: &AppState) -> Result<CleanupReport, AppError> {
    let report = cleanup_duplicates(&state.db).await?;
    if report.deleted > 0 {
        invalidate_pages(&state.redis).await;
    }
    Ok(report)
}

pub async fn run_expiry(state: &AppState) -> Result<ExpiryRun, AppError> {
    let max_age_days = state.config.max_job_age_days;
    let expired = expire_old_jobs(&state.db, max_age_days).await?;
    info!("Expired {expired} jobs older than {max_age_days} days");
    if expired > 0 {
        invalidate_pages(&state.redis).await;
    }
    Ok(ExpiryRun {
        max_age_days,
        expired,
    })
}

pub async fn run_blog(state: &AppState) -> Result<BlogPostRow, AppError> {
    let post = generate_post(&state.db, &state.llm).await?;
    invalidate_pages(&state.redis).await;
    Ok(post)
}

pub async fn run_digest(state: &AppState) -> Result<DigestReport, AppError> {
    Ok(send_digests(&state.db, &state.http, &state.config).await?)
}

/// Returns None when no Twitter token is configured.
pub async fn run_tweets(state: &AppState) -> Result<Option<TweetReport>, AppError> {
    let Some(token) = state.config.twitter_bearer_token.as_deref() else {
        info!("Twitter token not configured, skipping tweets");
        return Ok(None);
    };
    let report = tweet_new_jobs(
        &state.db,
        &state.http,
        token,
        &state.config.site_url,
        TWEETS_PER_RUN,
    )
    .await?;
    Ok(Some(report))
}

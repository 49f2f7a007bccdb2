//! In-process schedule for the batch jobs. Expressions have six fields,
//! seconds first.

use anyhow::Result;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::cron::tasks;
use crate::state::AppState;

pub const EXPIRY_CRON: &str = "0 30 3 * * *";
pub const DIGEST_CRON: &str = "0 0 14 * * MON";
pub const BLOG_CRON: &str = "0 0 9 * * *";

pub async fn start_scheduler(state: AppState) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    // Sync, then cleanup and cache invalidation, then tweet what is new
    let sync_state = state.clone();
    let sync_job = Job::new_async(state.config.sync_cron.as_str(), move |_uuid, _lock| {
        let state = sync_state.clone();
        Box::pin(async move {
            match tasks::run_sync(&state, None).await {
                Ok(run) => tracing::info!(
                    "Scheduled sync: {} inserted, {} deleted, {} sources failed",
                    run.inserted,
                    run.deleted,
                    run.failed_sources
                ),
                Err(e) => tracing::error!("Scheduled sync failed: {}", e),
            }
            if let Err(e) = tasks::run_tweets(&state).await {
                tracing::error!("Scheduled tweets failed: {}", e);
            }
        })
    })?;
    scheduler.add(sync_job).await?;

    let expiry_state = state.clone();
    let expiry_job = Job::new_async(EXPIRY_CRON, move |_uuid, _lock| {
        let state = expiry_state.clone();
        Box::pin(async move {
            if let Err(e) = tasks::run_expiry(&state).await {
                tracing::error!("Scheduled expiry failed: {}", e);
            }
        })
    })?;
    scheduler.add(expiry_job).await?;

    let digest_state = state.clone();
    let digest_job = Job::new_async(DIGEST_CRON, move |_uuid, _lock| {
        let state = digest_state.clone();
        Box::pin(async move {
            if let Err(e) = tasks::run_digest(&state).await {
                tracing::error!("Scheduled digest failed: {}", e);
            }
        })
    })?;
    scheduler.add(digest_job).await?;

    let blog_state = state.clone();
    let blog_job = Job::new_async(BLOG_CRON, move |_uuid, _lock| {
        let state = blog_state.clone();
        Box::pin(async move {
            match tasks::run_blog(&state).await {
                Ok(post) => tracing::info!("Scheduled blog post published: {}", post.slug),
                Err(e) => tracing::error!("Scheduled blog generation failed: {}", e),
            }
        })
    })?;
    scheduler.add(blog_job).await?;

    scheduler.start().await?;
    tracing::info!(
        "Scheduler started (sync '{}', expiry '{}', digest '{}', blog '{}')",
        state.config.sync_cron,
        EXPIRY_CRON,
        DIGEST_CRON,
        BLOG_CRON
    );
    Ok(scheduler)
}

use std::sync::Arc;

use redis::Client as RedisClient;
use reqwest::Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::resume::fit_scoring::ResumeScorer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Page cache for landing pages and the sitemap. Best-effort only.
    pub redis: RedisClient,
    pub llm: LlmClient,
    /// Outbound client for job boards, Stripe, Resend and Twitter.
    pub http: Client,
    pub config: Config,
    /// Pluggable resume scorer. Default: KeywordResumeScorer.
    pub resume_scorer: Arc<dyn ResumeScorer>,
}

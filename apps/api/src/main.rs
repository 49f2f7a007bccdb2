mod alerts;
mod billing;
mod blog;
mod config;
mod cron;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod models;
mod resume;
mod routes;
mod seo;
mod social;
mod sources;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::cron::scheduler::start_scheduler;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::resume::fit_scoring::KeywordResumeScorer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on missing required env vars
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting designjobs API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Redis is only a page cache; a bad URL fails here, an outage later does not
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    let llm = LlmClient::new(config.openai_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let state = AppState {
        db,
        redis,
        llm,
        http,
        config: config.clone(),
        resume_scorer: Arc::new(KeywordResumeScorer),
    };

    // Kept alive for the lifetime of the server
    let _scheduler = if config.enable_scheduler {
        Some(start_scheduler(state.clone()).await?)
    } else {
        info!("Scheduler disabled; batch jobs run only via /api/cron");
        None
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub openai_api_key: String,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub stripe_price_monthly: String,
    pub stripe_price_yearly: String,
    pub stripe_price_featured: String,
    pub resend_api_key: String,
    pub email_from: String,
    /// Tweeting is disabled when unset.
    pub twitter_bearer_token: Option<String>,
    pub cron_secret: String,
    pub site_url: String,
    pub enable_scheduler: bool,
    /// Six-field cron expression (seconds first) for the job sync.
    pub sync_cron: String,
    pub max_job_age_days: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            stripe_secret_key: require_env("STRIPE_SECRET_KEY")?,
            stripe_webhook_secret: require_env("STRIPE_WEBHOOK_SECRET")?,
            stripe_price_monthly: require_env("STRIPE_PRICE_MONTHLY")?,
            stripe_price_yearly: require_env("STRIPE_PRICE_YEARLY")?,
            stripe_price_featured: require_env("STRIPE_PRICE_FEATURED")?,
            resend_api_key: require_env("RESEND_API_KEY")?,
            email_from: env_or("EMAIL_FROM", "Remote Design Jobs <jobs@remotedesignjobs.co>"),
            twitter_bearer_token: std::env::var("TWITTER_BEARER_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            cron_secret: require_env("CRON_SECRET")?,
            site_url: env_or("SITE_URL", "https://remotedesignjobs.co")
                .trim_end_matches('/')
                .to_string(),
            enable_scheduler: env_or("ENABLE_SCHEDULER", "true")
                .parse::<bool>()
                .context("ENABLE_SCHEDULER must be true or false")?,
            sync_cron: env_or("SYNC_CRON", "0 0 */6 * * *"),
            max_job_age_days: env_or("MAX_JOB_AGE_DAYS", "60")
                .parse::<i64>()
                .context("MAX_JOB_AGE_DAYS must be an integer")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

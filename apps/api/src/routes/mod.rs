pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::alerts::handlers as alerts;
use crate::billing::handlers as billing;
use crate::blog::handlers as blog;
use crate::cron::{auth::require_cron_secret, handlers as cron};
use crate::jobs::handlers as jobs;
use crate::resume::{extract::MAX_UPLOAD_BYTES, handlers as resume};
use crate::seo::handlers as seo;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cron_routes = Router::new()
        .route("/sync-jobs", post(cron::handle_sync_jobs))
        .route("/cleanup-duplicates", post(cron::handle_cleanup_duplicates))
        .route("/expire-jobs", post(cron::handle_expire_jobs))
        .route("/generate-blog", post(cron::handle_generate_blog))
        .route("/send-digest", post(cron::handle_send_digest))
        .route("/tweet-jobs", post(cron::handle_tweet_jobs))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_cron_secret,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/sitemap.xml", get(seo::handle_sitemap))
        // Jobs
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/stats", get(jobs::handle_job_stats))
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route(
            "/api/v1/saved-jobs",
            get(jobs::handle_list_saved_jobs).post(jobs::handle_save_job),
        )
        .route("/api/v1/saved-jobs/:job_id", delete(jobs::handle_unsave_job))
        // SEO landing pages
        .route("/api/v1/landing/:dimension/:value", get(seo::handle_landing))
        // Blog
        .route("/api/v1/blog", get(blog::handle_list_posts))
        .route("/api/v1/blog/:slug", get(blog::handle_get_post))
        // Resume tools
        .route(
            "/api/v1/resume/extract",
            post(resume::handle_extract).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        .route("/api/v1/resume/analyze", post(resume::handle_analyze))
        .route("/api/v1/resume/cover-letter", post(resume::handle_cover_letter))
        // Billing
        .route("/api/v1/billing/checkout", post(billing::handle_checkout))
        .route("/api/v1/billing/portal", post(billing::handle_portal))
        .route("/api/v1/billing/status", get(billing::handle_status))
        .route("/api/v1/webhooks/stripe", post(billing::handle_stripe_webhook))
        // Alerts
        .route("/api/v1/subscribers", post(alerts::handle_subscribe))
        .route(
            "/api/v1/subscribers/unsubscribe",
            get(alerts::handle_unsubscribe),
        )
        .nest("/api/cron", cron_routes)
        .with_state(state)
}

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::billing::stripe::{self, CheckoutParams, CheckoutPlan};
use crate::billing::webhook::{self, StripeEvent};
use crate::errors::AppError;
use crate::jobs::repository;
use crate::models::subscriber::SubscriptionRow;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub user_id: Uuid,
    pub email: String,
    pub plan: CheckoutPlan,
    pub job_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct PortalRequest {
    pub user_id: Uuid,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct SessionUrl {
    pub url: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BillingStatus {
    pub is_pro: bool,
    pub status: Option<String>,
    pub plan: Option<String>,
    pub current_period_end: Option<DateTime<Utc>>,
}

impl From<Option<SubscriptionRow>> for BillingStatus {
    fn from(row: Option<SubscriptionRow>) -> Self {
        match row {
            Some(row) => BillingStatus {
                is_pro: row.is_active(),
                status: Some(row.status),
                plan: Some(row.plan),
                current_period_end: row.current_period_end,
            },
            None => BillingStatus {
                is_pro: false,
                status: None,
                plan: None,
                current_period_end: None,
            },
        }
    }
}

async fn find_subscription(pool: &PgPool, user_id: Uuid) -> Result<Option<SubscriptionRow>, AppError> {
    let row = sqlx::query_as::<_, SubscriptionRow>("SELECT * FROM subscriptions WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// POST /api/v1/billing/checkout
pub async fn handle_checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<SessionUrl>, AppError> {
    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }

    let job_id = match (req.plan, req.job_id) {
        (CheckoutPlan::FeaturedJob, None) => {
            return Err(AppError::Validation(
                "featured_job checkout requires a job_id".to_string(),
            ))
        }
        (CheckoutPlan::FeaturedJob, Some(job_id)) => {
            if repository::get_job(&state.db, job_id).await?.is_none() {
                return Err(AppError::NotFound(format!("Job {job_id} not found")));
            }
            Some(job_id)
        }
        (_, _) => None,
    };

    let existing = find_subscription(&state.db, req.user_id).await?;
    let params = CheckoutParams {
        user_id: req.user_id,
        email,
        plan: req.plan,
        price_id: req.plan.price_id(&state.config),
        job_id,
        customer_id: existing.as_ref().map(|s| s.stripe_customer_id.as_str()),
        site_url: &state.config.site_url,
    };

    let url =
        stripe::create_checkout_session(&state.http, &state.config.stripe_secret_key, &params)
            .await?;
    Ok(Json(SessionUrl { url }))
}

/// POST /api/v1/billing/portal
pub async fn handle_portal(
    State(state): State<AppState>,
    Json(req): Json<PortalRequest>,
) -> Result<Json<SessionUrl>, AppError> {
    let subscription = find_subscription(&state.db, req.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No billing account for this user".to_string()))?;

    let return_url = format!("{}/account", state.config.site_url);
    let url = stripe::create_portal_session(
        &state.http,
        &state.config.stripe_secret_key,
        &subscription.stripe_customer_id,
        &return_url,
    )
    .await?;
    Ok(Json(SessionUrl { url }))
}

/// GET /api/v1/billing/status
pub async fn handle_status(
    State(state): State<AppState>,
    Query(params): Query<StatusQuery>,
) -> Result<Json<BillingStatus>, AppError> {
    let row = find_subscription(&state.db, params.user_id).await?;
    Ok(Json(BillingStatus::from(row)))
}

/// POST /api/v1/webhooks/stripe
///
/// Takes the raw body: the signature covers the exact bytes Stripe sent.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Validation("Missing Stripe-Signature header".to_string()))?;

    webhook::verify_signature(
        &body,
        signature,
        &state.config.stripe_webhook_secret,
        Utc::now().timestamp(),
    )
    .map_err(|e| {
        warn!("Rejected Stripe webhook: {e}");
        AppError::Validation(e.to_string())
    })?;

    let event: StripeEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::Validation(format!("Invalid Stripe event: {e}")))?;

    webhook::handle_event(&state.db, &event).await?;
    Ok(Json(json!({ "received": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> SubscriptionRow {
        SubscriptionRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            email: "sam@example.com".to_string(),
            stripe_customer_id: "cus_1".to_string(),
            stripe_subscription_id: Some("sub_1".to_string()),
            plan: "monthly".to_string(),
            status: status.to_string(),
            current_period_end: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_without_subscription() {
        let status = BillingStatus::from(None);
        assert!(!status.is_pro);
        assert!(status.plan.is_none());
    }

    #[test]
    fn test_status_active_and_canceled() {
        assert!(BillingStatus::from(Some(row("active"))).is_pro);
        assert!(BillingStatus::from(Some(row("trialing"))).is_pro);

        let canceled = BillingStatus::from(Some(row("canceled")));
        assert!(!canceled.is_pro);
        assert_eq!(canceled.status.as_deref(), Some("canceled"));
        assert_eq!(canceled.plan.as_deref(), Some("monthly"));
    }
}

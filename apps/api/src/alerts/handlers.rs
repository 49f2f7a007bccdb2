use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tracing::{info, warn};
use uuid::Uuid;

use crate::alerts::digest::{render_welcome, unsubscribe_url};
use crate::alerts::resend::{send_email, Email};
use crate::errors::AppError;
use crate::jobs::normalize::{JOB_TYPES, REGIONS};
use crate::models::subscriber::SubscriberRow;
use crate::state::AppState;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").unwrap();
}

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
    #[serde(default)]
    pub job_types: Vec<String>,
    #[serde(default)]
    pub regions: Vec<String>,
}

#[derive(Serialize)]
pub struct SubscribeResponse {
    pub email: String,
    pub job_types: Vec<String>,
    pub regions: Vec<String>,
    pub subscribed: bool,
}

#[derive(Deserialize)]
pub struct UnsubscribeQuery {
    pub token: Uuid,
}

#[derive(FromRow)]
struct Upserted {
    #[sqlx(flatten)]
    subscriber: SubscriberRow,
    inserted: bool,
}

/// Lowercases the email and checks preferences against the known vocabulary.
pub fn validate_subscription(req: SubscribeRequest) -> Result<SubscribeRequest, AppError> {
    let email = req.email.trim().to_lowercase();
    if email.len() > 254 || !EMAIL.is_match(&email) {
        return Err(AppError::Validation(format!("'{}' is not a valid email", req.email.trim())));
    }
    if let Some(bad) = req.job_types.iter().find(|t| !JOB_TYPES.contains(&t.as_str())) {
        return Err(AppError::Validation(format!("Unknown job type '{bad}'")));
    }
    if let Some(bad) = req.regions.iter().find(|r| !REGIONS.contains(&r.as_str())) {
        return Err(AppError::Validation(format!("Unknown region '{bad}'")));
    }
    Ok(SubscribeRequest { email, ..req })
}

/// POST /api/v1/subscribers
pub async fn handle_subscribe(
    State(state): State<AppState>,
    Json(req): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscribeResponse>), AppError> {
    let req = validate_subscription(req)?;

    // xmax is zero only for freshly inserted tuples
    let upserted = sqlx::query_as::<_, Upserted>(
        r#"
        INSERT INTO subscribers (email, job_types, regions)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE SET
            job_types = EXCLUDED.job_types,
            regions = EXCLUDED.regions
        RETURNING *, (xmax = 0) AS inserted
        "#,
    )
    .bind(&req.email)
    .bind(&req.job_types)
    .bind(&req.regions)
    .fetch_one(&state.db)
    .await?;

    let subscriber = upserted.subscriber;
    if upserted.inserted {
        info!("New subscriber {}", subscriber.id);
        let unsubscribe = unsubscribe_url(&state.config.site_url, subscriber.unsubscribe_token);
        let html = render_welcome(&state.config.site_url, &unsubscribe);
        let welcome = Email {
            from: &state.config.email_from,
            to: vec![subscriber.email.as_str()],
            subject: "Welcome to Remote Design Jobs alerts",
            html: &html,
        };
        // the subscription stands even if the welcome email fails
        if let Err(e) = send_email(&state.http, &state.config.resend_api_key, &welcome).await {
            warn!("Welcome email to subscriber {} failed: {e}", subscriber.id);
        }
    }

    let status = if upserted.inserted {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(SubscribeResponse {
            email: subscriber.email,
            job_types: subscriber.job_types,
            regions: subscriber.regions,
            subscribed: true,
        }),
    ))
}

/// GET /api/v1/subscribers/unsubscribe
pub async fn handle_unsubscribe(
    State(state): State<AppState>,
    Query(params): Query<UnsubscribeQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = sqlx::query("DELETE FROM subscribers WHERE unsubscribe_token = $1")
        .bind(params.token)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Subscription not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "unsubscribed": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: &str, job_types: &[&str], regions: &[&str]) -> SubscribeRequest {
        SubscribeRequest {
            email: email.to_string(),
            job_types: job_types.iter().map(|s| s.to_string()).collect(),
            regions: regions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_email_is_trimmed_and_lowercased() {
        let req = validate_subscription(request("  Sam@Example.COM ", &[], &[])).unwrap();
        assert_eq!(req.email, "sam@example.com");
    }

    #[test]
    fn test_invalid_emails_rejected() {
        for email in ["", "sam", "sam@", "@example.com", "sam@example", "sam @example.com"] {
            assert!(
                validate_subscription(request(email, &[], &[])).is_err(),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn test_preferences_checked_against_vocabulary() {
        assert!(validate_subscription(request("a@b.co", &["full_time"], &["europe"])).is_ok());
        assert!(validate_subscription(request("a@b.co", &["gig"], &[])).is_err());
        assert!(validate_subscription(request("a@b.co", &[], &["mars"])).is_err());
    }

    #[test]
    fn test_preferences_default_to_empty() {
        let req: SubscribeRequest = serde_json::from_str(r#"{"email":"a@b.co"}"#).unwrap();
        assert!(req.job_types.is_empty());
        assert!(req.regions.is_empty());
    }
}

//! Stripe webhook verification and event handling.

use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::Value;
use sha2::Sha256;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed payload, in seconds.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq)]
pub enum WebhookError {
    #[error("Stripe-Signature header is malformed")]
    Malformed,

    #[error("Stripe-Signature timestamp is outside the tolerance window")]
    Expired,

    #[error("No v1 signature matches the payload")]
    Mismatch,
}

/// Verifies a `Stripe-Signature` header (`t=...,v1=...[,v1=...]`) against the
/// raw request body. Any matching `v1` entry is accepted.
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), WebhookError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = value.parse().ok(),
            // undecodable entries cannot match anything
            "v1" => {
                if let Ok(sig) = hex::decode(value) {
                    signatures.push(sig);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(WebhookError::Malformed)?;
    if signatures.is_empty() {
        return Err(WebhookError::Malformed);
    }
    let skew = now.checked_sub(timestamp).map(i64::unsigned_abs);
    if !matches!(skew, Some(s) if s <= SIGNATURE_TOLERANCE_SECS as u64) {
        return Err(WebhookError::Expired);
    }

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| WebhookError::Malformed)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    if signatures
        .iter()
        .any(|sig| mac.clone().verify_slice(sig).is_ok())
    {
        Ok(())
    } else {
        Err(WebhookError::Mismatch)
    }
}

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: Value,
}

#[derive(Debug, Default, Deserialize)]
struct SessionMetadata {
    user_id: Option<String>,
    plan: Option<String>,
    job_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckoutSession {
    id: String,
    customer: Option<String>,
    subscription: Option<String>,
    client_reference_id: Option<String>,
    customer_email: Option<String>,
    customer_details: Option<CustomerDetails>,
    #[serde(default)]
    metadata: SessionMetadata,
}

#[derive(Debug, Deserialize)]
struct CustomerDetails {
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Subscription {
    id: String,
    status: String,
    current_period_end: Option<i64>,
}

/// What a webhook event asks the database to do. Split from the writes so
/// the event mapping is testable without Postgres.
#[derive(Debug, PartialEq)]
pub enum BillingAction {
    UpsertSubscription {
        user_id: Uuid,
        email: String,
        customer_id: String,
        subscription_id: Option<String>,
        plan: String,
    },
    FeatureJob {
        job_id: Uuid,
    },
    UpdateSubscription {
        subscription_id: String,
        status: String,
        current_period_end: Option<DateTime<Utc>>,
    },
    Ignore,
}

fn parse_uuid(value: Option<&str>, what: &str) -> Result<Uuid, AppError> {
    value
        .and_then(|v| Uuid::parse_str(v).ok())
        .ok_or_else(|| AppError::Validation(format!("Checkout session has no valid {what}")))
}

fn decode_object<T: serde::de::DeserializeOwned>(event: &StripeEvent) -> Result<T, AppError> {
    serde_json::from_value(event.data.object.clone()).map_err(|e| {
        AppError::Validation(format!("Malformed {} payload: {e}", event.event_type))
    })
}

pub fn action_for(event: &StripeEvent) -> Result<BillingAction, AppError> {
    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let session: CheckoutSession = decode_object(event)?;

            if session.metadata.plan.as_deref() == Some("featured_job") {
                let job_id = parse_uuid(session.metadata.job_id.as_deref(), "job_id")?;
                return Ok(BillingAction::FeatureJob { job_id });
            }

            let user_id = parse_uuid(
                session
                    .client_reference_id
                    .as_deref()
                    .or(session.metadata.user_id.as_deref()),
                "user_id",
            )?;
            let customer_id = session.customer.ok_or_else(|| {
                AppError::Validation(format!("Checkout session {} has no customer", session.id))
            })?;
            let email = session
                .customer_details
                .and_then(|d| d.email)
                .or(session.customer_email)
                .unwrap_or_default();

            Ok(BillingAction::UpsertSubscription {
                user_id,
                email,
                customer_id,
                subscription_id: session.subscription,
                plan: session.metadata.plan.unwrap_or_else(|| "monthly".to_string()),
            })
        }
        "customer.subscription.updated" | "customer.subscription.deleted" => {
            let subscription: Subscription = decode_object(event)?;
            let status = if event.event_type == "customer.subscription.deleted" {
                "canceled".to_string()
            } else {
                subscription.status
            };
            Ok(BillingAction::UpdateSubscription {
                subscription_id: subscription.id,
                status,
                current_period_end: subscription
                    .current_period_end
                    .and_then(|ts| Utc.timestamp_opt(ts, 0).single()),
            })
        }
        _ => Ok(BillingAction::Ignore),
    }
}

pub async fn apply_action(pool: &PgPool, action: BillingAction) -> Result<(), AppError> {
    match action {
        BillingAction::UpsertSubscription {
            user_id,
            email,
            customer_id,
            subscription_id,
            plan,
        } => {
            sqlx::query(
                r#"
                INSERT INTO subscriptions
                    (user_id, email, stripe_customer_id, stripe_subscription_id, plan, status)
                VALUES ($1, $2, $3, $4, $5, 'active')
                ON CONFLICT (user_id) DO UPDATE SET
                    email = EXCLUDED.email,
                    stripe_customer_id = EXCLUDED.stripe_customer_id,
                    stripe_subscription_id = EXCLUDED.stripe_subscription_id,
                    plan = EXCLUDED.plan,
                    status = 'active',
                    updated_at = now()
                "#,
            )
            .bind(user_id)
            .bind(&email)
            .bind(&customer_id)
            .bind(&subscription_id)
            .bind(&plan)
            .execute(pool)
            .await?;
            info!("Activated {plan} subscription for user {user_id}");
        }
        BillingAction::FeatureJob { job_id } => {
            let result =
                sqlx::query("UPDATE jobs SET is_featured = TRUE, updated_at = now() WHERE id = $1")
                    .bind(job_id)
                    .execute(pool)
                    .await?;
            if result.rows_affected() == 0 {
                warn!("Featured-job payment for unknown job {job_id}");
            } else {
                info!("Job {job_id} is now featured");
            }
        }
        BillingAction::UpdateSubscription {
            subscription_id,
            status,
            current_period_end,
        } => {
            let result = sqlx::query(
                r#"
                UPDATE subscriptions
                SET status = $2,
                    current_period_end = COALESCE($3, current_period_end),
                    updated_at = now()
                WHERE stripe_subscription_id = $1
                "#,
            )
            .bind(&subscription_id)
            .bind(&status)
            .bind(current_period_end)
            .execute(pool)
            .await?;
            if result.rows_affected() == 0 {
                warn!("Subscription {subscription_id} not found; status {status} dropped");
            } else {
                info!("Subscription {subscription_id} is now {status}");
            }
        }
        BillingAction::Ignore => {}
    }
    Ok(())
}

pub async fn handle_event(pool: &PgPool, event: &StripeEvent) -> Result<(), AppError> {
    let action = action_for(event)?;
    if action == BillingAction::Ignore {
        debug!(event_id = %event.id, event_type = %event.event_type, "Ignoring Stripe event");
        return Ok(());
    }
    info!(event_id = %event.id, event_type = %event.event_type, "Handling Stripe event");
    apply_action(pool, action).await
}

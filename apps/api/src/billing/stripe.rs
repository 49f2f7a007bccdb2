//! Minimal Stripe REST client: Checkout and Billing Portal sessions.
//!
//! Stripe takes form-encoded bodies with bracketed keys (`metadata[user_id]`),
//! so requests are built as key/value pairs.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;

const STRIPE_API: &str = "https://api.stripe.com/v1";

#[derive(Debug, Error)]
pub enum StripeError {
    #[error("Stripe request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Stripe returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected Stripe response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Stripe {0} session has no URL")]
    MissingUrl(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPlan {
    Monthly,
    Yearly,
    FeaturedJob,
}

impl CheckoutPlan {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckoutPlan::Monthly => "monthly",
            CheckoutPlan::Yearly => "yearly",
            CheckoutPlan::FeaturedJob => "featured_job",
        }
    }

    pub fn is_subscription(self) -> bool {
        !matches!(self, CheckoutPlan::FeaturedJob)
    }

    pub fn price_id(self, config: &Config) -> &str {
        match self {
            CheckoutPlan::Monthly => &config.stripe_price_monthly,
            CheckoutPlan::Yearly => &config.stripe_price_yearly,
            CheckoutPlan::FeaturedJob => &config.stripe_price_featured,
        }
    }
}

pub struct CheckoutParams<'a> {
    pub user_id: Uuid,
    pub email: &'a str,
    pub plan: CheckoutPlan,
    pub price_id: &'a str,
    pub job_id: Option<Uuid>,
    /// Reused so a returning subscriber keeps one Stripe customer.
    pub customer_id: Option<&'a str>,
    pub site_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    message: String,
}

pub fn checkout_form(params: &CheckoutParams<'_>) -> Vec<(String, String)> {
    let user_id = params.user_id.to_string();
    let mode = if params.plan.is_subscription() {
        "subscription"
    } else {
        "payment"
    };
    let cancel_path = match params.job_id {
        Some(job_id) => format!("/jobs/{job_id}"),
        None => "/pricing".to_string(),
    };

    let mut form: Vec<(String, String)> = vec![
        ("mode".into(), mode.into()),
        ("line_items[0][price]".into(), params.price_id.into()),
        ("line_items[0][quantity]".into(), "1".into()),
        (
            "success_url".into(),
            format!(
                "{}/billing/success?session_id={{CHECKOUT_SESSION_ID}}",
                params.site_url
            ),
        ),
        ("cancel_url".into(), format!("{}{cancel_path}", params.site_url)),
        ("client_reference_id".into(), user_id.clone()),
        ("metadata[user_id]".into(), user_id.clone()),
        ("metadata[plan]".into(), params.plan.as_str().into()),
    ];

    match params.customer_id {
        Some(customer) => form.push(("customer".into(), customer.into())),
        None => form.push(("customer_email".into(), params.email.into())),
    }
    if let Some(job_id) = params.job_id {
        form.push(("metadata[job_id]".into(), job_id.to_string()));
    }
    if params.plan.is_subscription() {
        // subscription events do not carry the session's metadata
        form.push(("subscription_data[metadata][user_id]".into(), user_id));
        form.push((
            "subscription_data[metadata][plan]".into(),
            params.plan.as_str().into(),
        ));
    }
    form
}

async fn post_form(
    http: &Client,
    secret_key: &str,
    path: &str,
    form: &[(String, String)],
) -> Result<SessionResponse, StripeError> {
    let response = http
        .post(format!("{STRIPE_API}{path}"))
        .bearer_auth(secret_key)
        .form(form)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<StripeErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        warn!("Stripe {path} returned {status}: {message}");
        return Err(StripeError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

/// Creates a Checkout session and returns its hosted URL.
pub async fn create_checkout_session(
    http: &Client,
    secret_key: &str,
    params: &CheckoutParams<'_>,
) -> Result<String, StripeError> {
    let session = post_form(http, secret_key, "/checkout/sessions", &checkout_form(params)).await?;
    info!(
        "Created checkout session {} for user {} ({})",
        session.id,
        params.user_id,
        params.plan.as_str()
    );
    session.url.ok_or(StripeError::MissingUrl("checkout"))
}

/// Creates a Billing Portal session for an existing customer.
pub async fn create_portal_session(
    http: &Client,
    secret_key: &str,
    customer_id: &str,
    return_url: &str,
) -> Result<String, StripeError> {
    let form = vec![
        ("customer".to_string(), customer_id.to_string()),
        ("return_url".to_string(), return_url.to_string()),
    ];
    let session = post_form(http, secret_key, "/billing_portal/sessions", &form).await?;
    session.url.ok_or(StripeError::MissingUrl("portal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
        form.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_subscription_checkout_form() {
        let user_id = Uuid::new_v4();
        let params = CheckoutParams {
            user_id,
            email: "sam@example.com",
            plan: CheckoutPlan::Yearly,
            price_id: "price_yearly",
            job_id: None,
            customer_id: None,
            site_url: "https://example.com",
        };
        let form = checkout_form(&params);
        assert_eq!(lookup(&form, "mode"), Some("subscription"));
        assert_eq!(lookup(&form, "line_items[0][price]"), Some("price_yearly"));
        assert_eq!(lookup(&form, "customer_email"), Some("sam@example.com"));
        assert_eq!(lookup(&form, "client_reference_id"), Some(user_id.to_string().as_str()));
        assert_eq!(lookup(&form, "subscription_data[metadata][plan]"), Some("yearly"));
        assert_eq!(lookup(&form, "cancel_url"), Some("https://example.com/pricing"));
        assert_eq!(
            lookup(&form, "success_url"),
            Some("https://example.com/billing/success?session_id={CHECKOUT_SESSION_ID}")
        );
    }

    #[test]
    fn test_featured_job_checkout_form() {
        let job_id = Uuid::new_v4();
        let params = CheckoutParams {
            user_id: Uuid::new_v4(),
            email: "sam@example.com",
            plan: CheckoutPlan::FeaturedJob,
            price_id: "price_featured",
            job_id: Some(job_id),
            customer_id: Some("cus_123"),
            site_url: "https://example.com",
        };
        let form = checkout_form(&params);
        assert_eq!(lookup(&form, "mode"), Some("payment"));
        assert_eq!(lookup(&form, "customer"), Some("cus_123"));
        assert!(lookup(&form, "customer_email").is_none());
        assert_eq!(lookup(&form, "metadata[job_id]"), Some(job_id.to_string().as_str()));
        assert!(lookup(&form, "subscription_data[metadata][user_id]").is_none());
    }

    #[test]
    fn test_plan_serde() {
        let plan: CheckoutPlan = serde_json::from_str(r#""featured_job""#).unwrap();
        assert_eq!(plan, CheckoutPlan::FeaturedJob);
        assert!(!plan.is_subscription());
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job-alert email subscriber.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriberRow {
    pub id: Uuid,
    pub email: String,
    pub job_types: Vec<String>,
    pub regions: Vec<String>,
    pub unsubscribe_token: Uuid,
    pub last_digest_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A paid Stripe subscription, one per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriptionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub stripe_customer_id: String,
    pub stripe_subscription_id: Option<String>,
    pub plan: String,
    pub status: String,
    pub current_period_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionRow {
    pub fn is_active(&self) -> bool {
        matches!(self.status.as_str(), "active" | "trialing")
    }
}

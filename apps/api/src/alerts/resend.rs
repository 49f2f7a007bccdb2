//! Resend transactional email client.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const RESEND_EMAILS_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Resend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resend returned {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Serialize)]
pub struct Email<'a> {
    pub from: &'a str,
    pub to: Vec<&'a str>,
    pub subject: &'a str,
    pub html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

pub async fn send_email(http: &Client, api_key: &str, email: &Email<'_>) -> Result<String, EmailError> {
    let response = http
        .post(RESEND_EMAILS_URL)
        .bearer_auth(api_key)
        .json(email)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(EmailError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let sent: SendResponse = response.json().await?;
    debug!("Sent email {} to {:?}", sent.id, email.to);
    Ok(sent.id)
}

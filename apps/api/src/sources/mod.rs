//! Job source adapters, one per external board or ATS.
//!
//! Every adapter implements `JobSource` and returns `RawJob`s exactly as the
//! upstream describes them. Classification and filtering happen later in
//! `jobs::normalize`, so adapters stay thin: request, decode, map fields.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

pub mod ashby;
pub mod greenhouse;
pub mod lever;
pub mod registry;
pub mod remoteok;
pub mod remotive;
pub mod workable;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{source_name} returned status {status}")]
    Status { source_name: String, status: u16 },

    #[error("Failed to decode {source_name} response: {message}")]
    Decode {
        source_name: String,
        message: String,
    },
}

/// A job as the upstream describes it, before classification.
#[derive(Debug, Clone, Default)]
pub struct RawJob {
    pub title: String,
    pub company: String,
    pub company_logo: Option<String>,
    pub location: Option<String>,
    /// Explicit remote flag when the source has one.
    pub remote: Option<bool>,
    pub employment_type: Option<String>,
    pub salary_text: Option<String>,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub salary_currency: Option<String>,
    /// HTML or plain text.
    pub description: String,
    pub url: String,
    pub source_id: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
}

/// An external source of job postings.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Stable key stored in `jobs.source`, e.g. `greenhouse:figma`.
    /// Stale-job deletion is scoped to this key.
    fn name(&self) -> &str;

    async fn fetch(&self, http: &Client) -> Result<Vec<RawJob>, SourceError>;
}

/// GETs `url` and decodes the JSON body, mapping failures to `SourceError`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    source_name: &str,
    url: &str,
) -> Result<T, SourceError> {
    debug!("Fetching {source_name} from {url}");

    let response = http
        .get(url)
        .header("accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            source_name: source_name.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    decode(source_name, &body)
}

pub(crate) fn decode<T: DeserializeOwned>(source_name: &str, body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::Decode {
        source_name: source_name.to_string(),
        message: e.to_string(),
    })
}

/// Parses RFC 3339 timestamps, tolerating the date-only form some boards use.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
        .or_else(|| {
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.and_utc())
        })
}

pub type FetchResult = (String, Result<Vec<RawJob>, SourceError>);

async fn fetch_one(source: Arc<dyn JobSource>, http: &Client) -> FetchResult {
    let result = source.fetch(http).await;
    (source.name().to_string(), result)
}

/// Fetches every source with bounded concurrency. One failing source never
/// aborts the others; results come back in completion order.
pub async fn fetch_all(
    sources: &[Arc<dyn JobSource>],
    http: &Client,
    concurrency: usize,
) -> Vec<FetchResult> {
    // boxed up front so the returned future stays Send
    let fetches: Vec<BoxFuture<'_, FetchResult>> = sources
        .iter()
        .cloned()
        .map(|source| fetch_one(source, http).boxed())
        .collect();

    stream::iter(fetches)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

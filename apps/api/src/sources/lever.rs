//! Lever postings API: `api.lever.co/v0/postings/{company}?mode=json`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use super::{get_json, JobSource, RawJob, SourceError};

const BASE_URL: &str = "https://api.lever.co/v0/postings";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeverPosting {
    id: String,
    text: String,
    hosted_url: String,
    #[serde(default)]
    categories: LeverCategories,
    workplace_type: Option<String>,
    #[serde(default)]
    description_plain: String,
    /// Milliseconds since epoch.
    created_at: Option<i64>,
    salary_range: Option<LeverSalaryRange>,
}

#[derive(Debug, Default, Deserialize)]
struct LeverCategories {
    commitment: Option<String>,
    location: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LeverSalaryRange {
    min: Option<f64>,
    max: Option<f64>,
    currency: Option<String>,
    interval: Option<String>,
}

pub struct LeverSource {
    name: String,
    company_slug: String,
    company: String,
}

impl LeverSource {
    pub fn new(company_slug: &str, company: &str) -> Self {
        Self {
            name: format!("lever:{company_slug}"),
            company_slug: company_slug.to_string(),
            company: company.to_string(),
        }
    }

    fn map_postings(&self, postings: Vec<LeverPosting>) -> Vec<RawJob> {
        postings
            .into_iter()
            .map(|p| {
                // Only yearly ranges are comparable with the rest of the board.
                let salary = p
                    .salary_range
                    .filter(|s| {
                        s.interval
                            .as_deref()
                            .map(|i| i.contains("year"))
                            .unwrap_or(true)
                    });
                let remote = p.workplace_type.as_deref().map(|w| w == "remote");

                RawJob {
                    title: p.text,
                    company: self.company.clone(),
                    location: p.categories.location,
                    remote,
                    employment_type: p.categories.commitment,
                    salary_min: salary.as_ref().and_then(|s| s.min).map(|v| v as i32),
                    salary_max: salary.as_ref().and_then(|s| s.max).map(|v| v as i32),
                    salary_currency: salary.and_then(|s| s.currency),
                    description: p.description_plain,
                    url: p.hosted_url,
                    source_id: Some(p.id),
                    posted_at: p.created_at.and_then(DateTime::<Utc>::from_timestamp_millis),
                    ..Default::default()
                }
            })
            .collect()
    }
}

#[async_trait]
impl JobSource for LeverSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, http: &Client) -> Result<Vec<RawJob>, SourceError> {
        let url = format!("{BASE_URL}/{}?mode=json", self.company_slug);
        let postings: Vec<LeverPosting> = get_json(http, &self.name, &url).await?;
        Ok(self.map_postings(postings))
    }
}

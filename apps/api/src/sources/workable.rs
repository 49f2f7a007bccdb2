//! Workable widget API: `apply.workable.com/api/v1/widget/accounts/{account}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_json, parse_timestamp, JobSource, RawJob, SourceError};

const BASE_URL: &str = "https://apply.workable.com/api/v1/widget/accounts";

#[derive(Debug, Deserialize)]
struct AccountResponse {
    name: Option<String>,
    #[serde(default)]
    jobs: Vec<WorkableJob>,
}

#[derive(Debug, Deserialize)]
struct WorkableJob {
    title: String,
    shortcode: String,
    employment_type: Option<String>,
    #[serde(default)]
    telecommuting: bool,
    country: Option<String>,
    city: Option<String>,
    state: Option<String>,
    url: String,
    published_on: Option<String>,
    #[serde(default)]
    description: String,
}

impl WorkableJob {
    fn location(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|p| !p.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

pub struct WorkableSource {
    name: String,
    account: String,
    company: String,
}

impl WorkableSource {
    pub fn new(account: &str, company: &str) -> Self {
        Self {
            name: format!("workable:{account}"),
            account: account.to_string(),
            company: company.to_string(),
        }
    }

    fn map_jobs(&self, response: AccountResponse) -> Vec<RawJob> {
        let company = response
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.company.clone());

        response
            .jobs
            .into_iter()
            .map(|job| RawJob {
                location: job.location(),
                title: job.title,
                company: company.clone(),
                remote: Some(job.telecommuting),
                employment_type: job.employment_type,
                description: job.description,
                url: job.url,
                source_id: Some(job.shortcode),
                posted_at: job.published_on.as_deref().and_then(parse_timestamp),
                ..Default::default()
            })
            .collect()
    }
}

#[async_trait]
impl JobSource for WorkableSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, http: &Client) -> Result<Vec<RawJob>, SourceError> {
        let url = format!("{BASE_URL}/{}?details=true", self.account);
        let response: AccountResponse = get_json(http, &self.name, &url).await?;
        Ok(self.map_jobs(response))
    }
}

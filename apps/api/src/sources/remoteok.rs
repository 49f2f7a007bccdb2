//! RemoteOK aggregator: `remoteok.com/api?tag=design`.
//!
//! The response is a JSON array whose first element is a legal notice
//! rather than a job. The API rejects requests without a User-Agent.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::{parse_timestamp, JobSource, RawJob, SourceError};

const URL: &str = "https://remoteok.com/api?tag=design";
const USER_AGENT: &str = "designjobs/0.1 (+job aggregation)";

#[derive(Debug, Deserialize)]
struct RemoteOkJob {
    id: Value,
    date: Option<String>,
    company: String,
    company_logo: Option<String>,
    position: String,
    #[serde(default)]
    description: String,
    location: Option<String>,
    salary_min: Option<i64>,
    salary_max: Option<i64>,
    url: Option<String>,
    apply_url: Option<String>,
}

#[derive(Default)]
pub struct RemoteOkSource;

impl RemoteOkSource {
    fn map_items(items: Vec<Value>) -> Vec<RawJob> {
        items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<RemoteOkJob>(item).ok())
            .filter_map(|job| {
                // apply_url is usually the employer's own page
                let url = job
                    .apply_url
                    .filter(|u| !u.is_empty())
                    .or(job.url)
                    .filter(|u| !u.is_empty())?;
                let source_id = match &job.id {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some(RawJob {
                    title: job.position,
                    company: job.company,
                    company_logo: job.company_logo.filter(|l| !l.is_empty()),
                    location: job.location.filter(|l| !l.is_empty()),
                    remote: Some(true),
                    salary_min: positive_salary(job.salary_min),
                    salary_max: positive_salary(job.salary_max),
                    salary_currency: job.salary_min.filter(|v| *v > 0).map(|_| "USD".to_string()),
                    description: job.description,
                    url,
                    source_id: Some(source_id),
                    posted_at: job.date.as_deref().and_then(parse_timestamp),
                    ..Default::default()
                })
            })
            .collect()
    }
}

fn positive_salary(value: Option<i64>) -> Option<i32> {
    value
        .filter(|v| *v > 0)
        .and_then(|v| i32::try_from(v).ok())
}

#[async_trait]
impl JobSource for RemoteOkSource {
    fn name(&self) -> &str {
        "remoteok"
    }

    async fn fetch(&self, http: &Client) -> Result<Vec<RawJob>, SourceError> {
        let response = http
            .get(URL)
            .header("user-agent", USER_AGENT)
            .header("accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                source_name: self.name().to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let items: Vec<Value> = super::decode(self.name(), &body)?;
        Ok(Self::map_items(items))
    }
}

//! Ashby posting API: `api.ashbyhq.com/posting-api/job-board/{org}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_json, parse_timestamp, JobSource, RawJob, SourceError};

const BASE_URL: &str = "https://api.ashbyhq.com/posting-api/job-board";

#[derive(Debug, Deserialize)]
struct BoardResponse {
    jobs: Vec<AshbyJob>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AshbyJob {
    id: String,
    title: String,
    location: Option<String>,
    is_remote: Option<bool>,
    #[serde(default = "default_listed")]
    is_listed: bool,
    employment_type: Option<String>,
    job_url: String,
    published_at: Option<String>,
    #[serde(default)]
    description_html: String,
    compensation: Option<AshbyCompensation>,
}

fn default_listed() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AshbyCompensation {
    compensation_tier_summary: Option<String>,
}

pub struct AshbySource {
    name: String,
    org: String,
    company: String,
}

impl AshbySource {
    pub fn new(org: &str, company: &str) -> Self {
        Self {
            name: format!("ashby:{org}"),
            org: org.to_string(),
            company: company.to_string(),
        }
    }

    fn map_jobs(&self, response: BoardResponse) -> Vec<RawJob> {
        response
            .jobs
            .into_iter()
            .filter(|job| job.is_listed)
            .map(|job| RawJob {
                title: job.title,
                company: self.company.clone(),
                location: job.location,
                remote: job.is_remote,
                employment_type: job.employment_type,
                salary_text: job.compensation.and_then(|c| c.compensation_tier_summary),
                description: job.description_html,
                url: job.job_url,
                source_id: Some(job.id),
                posted_at: job.published_at.as_deref().and_then(parse_timestamp),
                ..Default::default()
            })
            .collect()
    }
}

#[async_trait]
impl JobSource for AshbySource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, http: &Client) -> Result<Vec<RawJob>, SourceError> {
        let url = format!("{BASE_URL}/{}?includeCompensation=true", self.org);
        let response: BoardResponse = get_json(http, &self.name, &url).await?;
        Ok(self.map_jobs(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::decode;

    const FIXTURE: &str = r#"{
        "apiVersion": "1",
        "jobs": [
            {
                "id": "0b1c",
                "title": "Product Designer, Growth",
                "location": "Remote",
                "isRemote": true,
                "isListed": true,
                "employmentType": "FullTime",
                "jobUrl": "https://jobs.ashbyhq.com/linear/0b1c",
                "applyUrl": "https://jobs.ashbyhq.com/linear/0b1c/application",
                "publishedAt": "2024-05-03T10:00:00.000+00:00",
                "descriptionHtml": "<p>Join us</p>",
                "compensation": {"compensationTierSummary": "$140K – $180K • Offers Equity"}
            },
            {
                "id": "9z9z",
                "title": "Hidden Designer",
                "isRemote": true,
                "isListed": false,
                "jobUrl": "https://jobs.ashbyhq.com/linear/9z9z"
            }
        ]
    }"#;

    #[test]
    fn test_maps_listed_ashby_jobs_only() {
        let source = AshbySource::new("linear", "Linear");
        let response: BoardResponse = decode(source.name(), FIXTURE).unwrap();
        let jobs = source.map_jobs(response);

        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Product Designer, Growth");
        assert_eq!(jobs[0].remote, Some(true));
        assert_eq!(jobs[0].employment_type.as_deref(), Some("FullTime"));
        assert_eq!(
            jobs[0].salary_text.as_deref(),
            Some("$140K – $180K • Offers Equity")
        );
        assert!(jobs[0].posted_at.is_some());
    }
}

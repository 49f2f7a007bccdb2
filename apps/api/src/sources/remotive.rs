//! Remotive aggregator: `remotive.com/api/remote-jobs?category=design`.
//! Every listing is remote; most apply links point back at Remotive.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_json, parse_timestamp, JobSource, RawJob, SourceError};

const URL: &str = "https://remotive.com/api/remote-jobs?category=design";

#[derive(Debug, Deserialize)]
struct RemotiveResponse {
    jobs: Vec<RemotiveJob>,
}

#[derive(Debug, Deserialize)]
struct RemotiveJob {
    id: u64,
    url: String,
    title: String,
    company_name: String,
    company_logo: Option<String>,
    job_type: Option<String>,
    publication_date: Option<String>,
    candidate_required_location: Option<String>,
    salary: Option<String>,
    #[serde(default)]
    description: String,
}

#[derive(Default)]
pub struct RemotiveSource;

impl RemotiveSource {
    fn map_jobs(response: RemotiveResponse) -> Vec<RawJob> {
        response
            .jobs
            .into_iter()
            .map(|job| RawJob {
                title: job.title,
                company: job.company_name,
                company_logo: job.company_logo.filter(|l| !l.is_empty()),
                location: job.candidate_required_location,
                remote: Some(true),
                employment_type: job.job_type,
                salary_text: job.salary.filter(|s| !s.trim().is_empty()),
                description: job.description,
                url: job.url,
                source_id: Some(job.id.to_string()),
                posted_at: job.publication_date.as_deref().and_then(parse_timestamp),
                ..Default::default()
            })
            .collect()
    }
}

#[async_trait]
impl JobSource for RemotiveSource {
    fn name(&self) -> &str {
        "remotive"
    }

    async fn fetch(&self, http: &Client) -> Result<Vec<RawJob>, SourceError> {
        let response: RemotiveResponse = get_json(http, self.name(), URL).await?;
        Ok(Self::map_jobs(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::decode;

    const FIXTURE: &str = r#"{
        "0-legal-notice": "Remotive API Legal Notice",
        "job-count": 1,
        "jobs": [
            {
                "id": 1900001,
                "url": "https://remotive.com/remote-jobs/design/senior-product-designer-1900001",
                "title": "Senior Product Designer",
                "company_name": "Doist",
                "company_logo": "https://remotive.com/job/1900001/logo",
                "category": "Design",
                "tags": ["figma"],
                "job_type": "full_time",
                "publication_date": "2024-05-02T08:11:52",
                "candidate_required_location": "Worldwide",
                "salary": "",
                "description": "<p>Async-first team.</p>"
            }
        ]
    }"#;

    #[test]
    fn test_maps_remotive_jobs() {
        let response: RemotiveResponse = decode("remotive", FIXTURE).unwrap();
        let jobs = RemotiveSource::map_jobs(response);

        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.company, "Doist");
        assert_eq!(job.remote, Some(true));
        assert_eq!(job.location.as_deref(), Some("Worldwide"));
        assert_eq!(job.employment_type.as_deref(), Some("full_time"));
        // empty salary strings are dropped
        assert!(job.salary_text.is_none());
        assert!(job.posted_at.is_some());
    }
}

//! Greenhouse job board API: `boards-api.greenhouse.io/v1/boards/{token}/jobs`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{get_json, parse_timestamp, JobSource, RawJob, SourceError};

const BASE_URL: &str = "https://boards-api.greenhouse.io/v1/boards";

#[derive(Debug, Deserialize)]
struct BoardResponse {
    jobs: Vec<GreenhouseJob>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseJob {
    id: u64,
    title: String,
    absolute_url: String,
    location: Option<GreenhouseLocation>,
    updated_at: Option<String>,
    first_published: Option<String>,
    /// Entity-escaped HTML.
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct GreenhouseLocation {
    name: String,
}

pub struct GreenhouseSource {
    name: String,
    board_token: String,
    company: String,
}

impl GreenhouseSource {
    pub fn new(board_token: &str, company: &str) -> Self {
        Self {
            name: format!("greenhouse:{board_token}"),
            board_token: board_token.to_string(),
            company: company.to_string(),
        }
    }

    fn map_jobs(&self, response: BoardResponse) -> Vec<RawJob> {
        response
            .jobs
            .into_iter()
            .map(|job| RawJob {
                title: job.title,
                company: self.company.clone(),
                location: job.location.map(|l| l.name),
                description: job.content,
                url: job.absolute_url,
                source_id: Some(job.id.to_string()),
                posted_at: job
                    .first_published
                    .or(job.updated_at)
                    .as_deref()
                    .and_then(parse_timestamp),
                ..Default::default()
            })
            .collect()
    }
}

#[async_trait]
impl JobSource for GreenhouseSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, http: &Client) -> Result<Vec<RawJob>, SourceError> {
        let url = format!("{BASE_URL}/{}/jobs?content=true", self.board_token);
        let response: BoardResponse = get_json(http, &self.name, &url).await?;
        Ok(self.map_jobs(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::decode;

    const FIXTURE: &str = r#"{
        "jobs": [
            {
                "id": 4012345,
                "title": "Senior Product Designer",
                "absolute_url": "https://boards.greenhouse.io/figma/jobs/4012345?gh_jid=4012345",
                "location": {"name": "Remote - US"},
                "updated_at": "2024-05-01T12:00:00-04:00",
                "first_published": "2024-04-20T09:00:00-04:00",
                "content": "&lt;p&gt;Shape the future of design tools.&lt;/p&gt;",
                "metadata": null
            },
            {
                "id": 4012346,
                "title": "Staff Engineer",
                "absolute_url": "https://boards.greenhouse.io/figma/jobs/4012346",
                "location": null,
                "updated_at": "2024-05-02T12:00:00Z"
            }
        ],
        "meta": {"total": 2}
    }"#;

    #[test]
    fn test_maps_greenhouse_board() {
        let source = GreenhouseSource::new("figma", "Figma");
        let response: BoardResponse = decode(source.name(), FIXTURE).unwrap();
        let jobs = source.map_jobs(response);

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].company, "Figma");
        assert_eq!(jobs[0].location.as_deref(), Some("Remote - US"));
        assert_eq!(jobs[0].source_id.as_deref(), Some("4012345"));
        assert!(jobs[0].description.starts_with("&lt;p&gt;"));
        // first_published wins over updated_at
        assert_eq!(
            jobs[0].posted_at.unwrap().to_rfc3339(),
            "2024-04-20T13:00:00+00:00"
        );
        assert!(jobs[1].location.is_none());
        assert!(jobs[1].description.is_empty());
    }

    #[test]
    fn test_source_name_includes_board() {
        assert_eq!(GreenhouseSource::new("figma", "Figma").name(), "greenhouse:figma");
    }
}

//! Posts new jobs to Twitter/X through the v2 API.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::models::job::JobRow;

const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";
pub const MAX_TWEET_CHARS: usize = 280;
/// Jobs older than this are never tweeted, even if untweeted.
const TWEET_WINDOW_HOURS: i64 = 48;

#[derive(Debug, Default, Serialize)]
pub struct TweetReport {
    pub candidates: usize,
    pub posted: usize,
    pub failed: usize,
    pub rate_limited: bool,
}

#[derive(Debug, Deserialize)]
struct TweetResponse {
    data: TweetData,
}

#[derive(Debug, Deserialize)]
struct TweetData {
    id: String,
}

fn region_tag(region: &str) -> &'static str {
    match region {
        "north_america" => " (North America)",
        "europe" => " (Europe)",
        "latin_america" => " (LatAm)",
        "asia_pacific" => " (APAC)",
        "africa" => " (Africa)",
        _ => "",
    }
}

/// Builds the tweet text. Only the title is shortened when the result would
/// exceed the limit.
pub fn compose_tweet(job: &JobRow, site_url: &str) -> String {
    let url = format!("{site_url}/jobs/{}", job.id);
    let suffix = format!(
        " at {}{}\n\n{url}\n\n#RemoteJobs #DesignJobs",
        job.company,
        region_tag(&job.region)
    );
    let room = MAX_TWEET_CHARS.saturating_sub(suffix.chars().count());

    let title = if job.title.chars().count() <= room {
        job.title.clone()
    } else {
        let mut cut: String = job.title.chars().take(room.saturating_sub(1)).collect();
        cut.truncate(cut.trim_end().len());
        cut.push('…');
        cut
    };

    let tweet = format!("{title}{suffix}");
    if tweet.chars().count() <= MAX_TWEET_CHARS {
        tweet
    } else {
        // company name alone is too long; fall back to the bare link
        let room = MAX_TWEET_CHARS.saturating_sub(url.chars().count() + 2);
        let title: String = job.title.chars().take(room).collect();
        format!("{title}\n\n{url}")
    }
}

enum PostOutcome {
    Posted(String),
    RateLimited,
}

async fn post_tweet(http: &Client, token: &str, text: &str) -> anyhow::Result<PostOutcome> {
    let response = http
        .post(TWEETS_URL)
        .bearer_auth(token)
        .json(&json!({ "text": text }))
        .send()
        .await?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Ok(PostOutcome::RateLimited);
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Twitter returned {status}: {body}");
    }
    let tweet: TweetResponse = response.json().await?;
    Ok(PostOutcome::Posted(tweet.data.id))
}

/// Tweets recent, untweeted jobs newest first and stamps `tweeted_at`.
/// Stops early when the API rate-limits.
pub async fn tweet_new_jobs(
    pool: &PgPool,
    http: &Client,
    token: &str,
    site_url: &str,
    limit: i64,
) -> anyhow::Result<TweetReport> {
    let jobs = sqlx::query_as::<_, JobRow>(
        r#"
        SELECT * FROM jobs
        WHERE tweeted_at IS NULL
          AND posted_at > now() - make_interval(hours => $1::int)
        ORDER BY is_featured DESC, posted_at DESC
        LIMIT $2
        "#,
    )
    .bind(TWEET_WINDOW_HOURS as i32)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let mut report = TweetReport {
        candidates: jobs.len(),
        ..Default::default()
    };

    for job in &jobs {
        let text = compose_tweet(job, site_url);
        match post_tweet(http, token, &text).await {
            Ok(PostOutcome::Posted(tweet_id)) => {
                sqlx::query("UPDATE jobs SET tweeted_at = now() WHERE id = $1")
                    .bind(job.id)
                    .execute(pool)
                    .await?;
                info!("Tweeted job {} as {tweet_id}", job.id);
                report.posted += 1;
            }
            Ok(PostOutcome::RateLimited) => {
                warn!("Twitter rate limit hit after {} tweets", report.posted);
                report.rate_limited = true;
                break;
            }
            Err(e) => {
                warn!("Tweet for job {} failed: {e:#}", job.id);
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

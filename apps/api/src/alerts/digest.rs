//! Weekly job-alert digests.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::alerts::resend::{send_email, Email};
use crate::config::Config;
use crate::jobs::repository;
use crate::models::job::JobRow;
use crate::models::subscriber::SubscriberRow;
use crate::seo::sitemap::xml_escape;

pub const MAX_DIGEST_JOBS: i64 = 15;
/// Look-back window for subscribers who have never received a digest.
pub const FIRST_DIGEST_DAYS: i64 = 7;

#[derive(Debug, Default, Serialize)]
pub struct DigestReport {
    pub subscribers: usize,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub fn unsubscribe_url(site_url: &str, token: Uuid) -> String {
    format!("{site_url}/api/v1/subscribers/unsubscribe?token={token}")
}

pub fn digest_since(subscriber: &SubscriberRow, now: DateTime<Utc>) -> DateTime<Utc> {
    subscriber
        .last_digest_at
        .unwrap_or_else(|| now - Duration::days(FIRST_DIGEST_DAYS))
}

fn label(value: &str) -> String {
    let spaced = value.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

fn salary_line(job: &JobRow) -> Option<String> {
    let currency = job.salary_currency.as_deref().unwrap_or("USD");
    match (job.salary_min, job.salary_max) {
        (Some(min), Some(max)) if min != max => Some(format!("{currency} {min}–{max}")),
        (Some(amount), _) | (None, Some(amount)) => Some(format!("{currency} {amount}")),
        (None, None) => None,
    }
}

pub fn render_digest(jobs: &[JobRow], site_url: &str, unsubscribe: &str) -> String {
    let mut items = String::new();
    for job in jobs {
        let mut meta = vec![label(&job.job_type), label(&job.region)];
        if let Some(salary) = salary_line(job) {
            meta.push(salary);
        }
        let badge = if job.is_featured { " ★" } else { "" };
        items.push_str(&format!(
            "<li style=\"margin-bottom:16px\"><a href=\"{url}\"><strong>{title}</strong></a>{badge}<br>{company}<br><small>{meta}</small></li>",
            url = xml_escape(&format!("{site_url}/jobs/{}", job.id)),
            title = xml_escape(&job.title),
            company = xml_escape(&job.company),
            meta = xml_escape(&meta.join(" · ")),
        ));
    }

    format!(
        "<html><body style=\"font-family:sans-serif\">\
         <h2>{count} new remote design jobs</h2>\
         <ul style=\"list-style:none;padding:0\">{items}</ul>\
         <p><a href=\"{site}\">Browse all jobs</a></p>\
         <p><small><a href=\"{unsub}\">Unsubscribe</a></small></p>\
         </body></html>",
        count = jobs.len(),
        site = xml_escape(site_url),
        unsub = xml_escape(unsubscribe),
    )
}

pub fn render_welcome(site_url: &str, unsubscribe: &str) -> String {
    format!(
        "<html><body style=\"font-family:sans-serif\">\
         <h2>You're subscribed</h2>\
         <p>Every week we'll send the newest remote design roles that match your preferences.</p>\
         <p><a href=\"{site}\">Browse current openings</a></p>\
         <p><small><a href=\"{unsub}\">Unsubscribe</a></small></p>\
         </body></html>",
        site = xml_escape(site_url),
        unsub = xml_escape(unsubscribe),
    )
}

async fn send_one(
    pool: &PgPool,
    http: &Client,
    config: &Config,
    subscriber: &SubscriberRow,
    now: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let jobs = repository::jobs_posted_since(
        pool,
        digest_since(subscriber, now),
        &subscriber.job_types,
        &subscriber.regions,
        MAX_DIGEST_JOBS,
    )
    .await?;
    if jobs.is_empty() {
        return Ok(false);
    }

    let unsubscribe = unsubscribe_url(&config.site_url, subscriber.unsubscribe_token);
    let html = render_digest(&jobs, &config.site_url, &unsubscribe);
    let subject = format!("{} new remote design jobs this week", jobs.len());
    send_email(
        http,
        &config.resend_api_key,
        &Email {
            from: &config.email_from,
            to: vec![subscriber.email.as_str()],
            subject: &subject,
            html: &html,
        },
    )
    .await?;

    sqlx::query("UPDATE subscribers SET last_digest_at = $2 WHERE id = $1")
        .bind(subscriber.id)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(true)
}

/// Sends each subscriber the jobs posted since their last digest. A failed
/// send leaves `last_digest_at` untouched so the next run retries it.
pub async fn send_digests(pool: &PgPool, http: &Client, config: &Config) -> anyhow::Result<DigestReport> {
    let subscribers = sqlx::query_as::<_, SubscriberRow>("SELECT * FROM subscribers ORDER BY created_at")
        .fetch_all(pool)
        .await?;

    let now = Utc::now();
    let mut report = DigestReport {
        subscribers: subscribers.len(),
        ..Default::default()
    };

    for subscriber in &subscribers {
        match send_one(pool, http, config, subscriber, now).await {
            Ok(true) => report.sent += 1,
            Ok(false) => report.skipped += 1,
            Err(e) => {
                warn!("Digest for subscriber {} failed: {e:#}", subscriber.id);
                report.failed += 1;
            }
        }
    }

    info!(
        "Digests: {} sent, {} skipped, {} failed",
        report.sent, report.skipped, report.failed
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, featured: bool) -> JobRow {
        let now = Utc::now();
        JobRow {
            id: Uuid::new_v4(),
            title: title.to_string(),
            company: "Figma".to_string(),
            company_logo: None,
            location: Some("Remote".to_string()),
            region: "north_america".to_string(),
            job_type: "full_time".to_string(),
            experience_level: "senior".to_string(),
            category: "product_design".to_string(),
            salary_min: Some(150_000),
            salary_max: Some(190_000),
            salary_currency: Some("USD".to_string()),
            description: String::new(),
            apply_url: "https://boards.greenhouse.io/figma/jobs/1".to_string(),
            source: "greenhouse:figma".to_string(),
            source_id: None,
            is_direct: true,
            is_featured: featured,
            tweeted_at: None,
            posted_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn subscriber(last: Option<DateTime<Utc>>) -> SubscriberRow {
        SubscriberRow {
            id: Uuid::new_v4(),
            email: "sam@example.com".to_string(),
            job_types: vec![],
            regions: vec![],
            unsubscribe_token: Uuid::new_v4(),
            last_digest_at: last,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_digest_since_defaults_to_a_week() {
        let now = Utc::now();
        assert_eq!(digest_since(&subscriber(None), now), now - Duration::days(7));
        let last = now - Duration::days(2);
        assert_eq!(digest_since(&subscriber(Some(last)), now), last);
    }

    #[test]
    fn test_render_digest_escapes_and_lists_jobs() {
        let jobs = vec![job("UX & <UI> Designer", true), job("Brand Designer", false)];
        let html = render_digest(&jobs, "https://example.com", "https://example.com/u?token=1");
        assert!(html.contains("2 new remote design jobs"));
        assert!(html.contains("UX &amp; &lt;UI&gt; Designer"));
        assert!(html.contains("Full time · North america · USD 150000–190000"));
        assert!(html.contains(&format!("https://example.com/jobs/{}", jobs[1].id)));
        assert!(html.contains("Unsubscribe"));
    }

    #[test]
    fn test_salary_line_variants() {
        let mut j = job("Designer", false);
        assert_eq!(salary_line(&j).as_deref(), Some("USD 150000–190000"));
        j.salary_max = None;
        assert_eq!(salary_line(&j).as_deref(), Some("USD 150000"));
        j.salary_min = None;
        assert!(salary_line(&j).is_none());
    }

    #[test]
    fn test_unsubscribe_url() {
        let token = Uuid::new_v4();
        assert_eq!(
            unsubscribe_url("https://example.com", token),
            format!("https://example.com/api/v1/subscribers/unsubscribe?token={token}")
        );
    }
}

//! sync-jobs ETL: fetch every source, normalize, reconcile against the table.
//!
//! Reconciliation is split into a pure planning step (`plan_sync`) and a thin
//! execution step that turns the plan into SQL.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::jobs::dedup::{dedup_key, dedupe_batch};
use crate::jobs::normalize::normalize;
use crate::jobs::repository::{delete_jobs, insert_jobs, load_existing, update_job};
use crate::models::job::{ExistingJob, NewJob};
use crate::sources::{fetch_all, JobSource, RawJob, SourceError};

/// Sources fetched at the same time.
pub const SOURCE_CONCURRENCY: usize = 4;

#[derive(Debug, Default)]
pub struct SyncPlan {
    pub inserts: Vec<NewJob>,
    /// Same source, same URL, changed content.
    pub updates: Vec<(Uuid, NewJob)>,
    /// Existing rows taken over by the incoming posting (new URL or a direct link
    /// replacing a middleman one).
    pub replacements: Vec<(Uuid, NewJob)>,
    pub unchanged: usize,
    pub skipped_duplicates: usize,
    pub stale_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub source: String,
    pub fetched: usize,
    pub relevant: usize,
    pub inserted: u64,
    pub updated: usize,
    pub replaced: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub deleted: u64,
    pub error: Option<String>,
}

fn content_changed(existing: &ExistingJob, incoming: &NewJob) -> bool {
    existing.title != incoming.title
        || existing.description != incoming.description
        || existing.location != incoming.location
        || existing.salary_min != incoming.salary_min
        || existing.salary_max != incoming.salary_max
}

/// Decides what to do with each incoming job from `source` given the whole table.
pub fn plan_sync(source: &str, existing: &[ExistingJob], incoming: Vec<NewJob>) -> SyncPlan {
    let had_incoming = !incoming.is_empty();
    let (incoming, batch_duplicates) = dedupe_batch(incoming);

    let mut plan = SyncPlan {
        skipped_duplicates: batch_duplicates,
        ..Default::default()
    };

    let by_url: HashMap<&str, &ExistingJob> =
        existing.iter().map(|e| (e.apply_url.as_str(), e)).collect();
    let mut by_key: HashMap<String, Vec<&ExistingJob>> = HashMap::new();
    for e in existing {
        by_key.entry(dedup_key(&e.title, &e.company)).or_default().push(e);
    }

    let mut claimed: HashSet<Uuid> = HashSet::new();

    for job in incoming {
        if let Some(row) = by_url.get(job.apply_url.as_str()) {
            claimed.insert(row.id);
            if row.source != source {
                plan.skipped_duplicates += 1;
            } else if content_changed(row, &job) {
                plan.updates.push((row.id, job));
            } else {
                plan.unchanged += 1;
            }
            continue;
        }

        let key = dedup_key(&job.title, &job.company);
        let candidate = by_key
            .get(&key)
            .and_then(|rows| rows.iter().find(|r| !claimed.contains(&r.id)).copied());

        match candidate {
            Some(row) => {
                claimed.insert(row.id);
                let takes_over = row.source == source || (job.is_direct && !row.is_direct);
                if takes_over {
                    plan.replacements.push((row.id, job));
                } else {
                    plan.skipped_duplicates += 1;
                }
            }
            None => plan.inserts.push(job),
        }
    }

    // An empty fetch usually means the board is down, not that every job closed.
    if had_incoming {
        plan.stale_ids = existing
            .iter()
            .filter(|e| e.source == source && !e.is_featured && !claimed.contains(&e.id))
            .map(|e| e.id)
            .collect();
    }

    plan
}

/// Fetches and reconciles a single source.
pub async fn sync_source(pool: &PgPool, http: &Client, source: &dyn JobSource) -> SyncReport {
    let result = source.fetch(http).await;
    apply_fetch(pool, source.name(), result).await
}

/// Fetches every source with bounded concurrency, then reconciles them one at
/// a time so dedup sees the previous source's writes.
pub async fn sync_all(
    pool: &PgPool,
    http: &Client,
    sources: &[Arc<dyn JobSource>],
) -> Vec<SyncReport> {
    let fetched = fetch_all(sources, http, SOURCE_CONCURRENCY).await;

    let mut reports = Vec::with_capacity(fetched.len());
    for (name, result) in fetched {
        reports.push(apply_fetch(pool, &name, result).await);
    }
    reports.sort_by(|a, b| a.source.cmp(&b.source));

    let inserted: u64 = reports.iter().map(|r| r.inserted).sum();
    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    info!(
        "Sync finished: {} sources, {} inserted, {} failed",
        reports.len(),
        inserted,
        failed
    );
    reports
}

async fn apply_fetch(
    pool: &PgPool,
    source: &str,
    result: Result<Vec<RawJob>, SourceError>,
) -> SyncReport {
    let raws = match result {
        Ok(raws) => raws,
        Err(e) => {
            warn!(source = %source, "Fetch failed: {e}");
            return SyncReport {
                source: source.to_string(),
                error: Some(e.to_string()),
                ..Default::default()
            };
        }
    };

    let fetched = raws.len();
    match reconcile(pool, source, raws).await {
        Ok(mut report) => {
            report.fetched = fetched;
            info!(
                source = %source,
                fetched = report.fetched,
                relevant = report.relevant,
                inserted = report.inserted,
                updated = report.updated,
                replaced = report.replaced,
                skipped = report.skipped,
                deleted = report.deleted,
                "Source synced"
            );
            report
        }
        Err(e) => {
            warn!(source = %source, "Write failed: {e:?}");
            SyncReport {
                source: source.to_string(),
                fetched,
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    }
}

async fn reconcile(pool: &PgPool, source: &str, raws: Vec<RawJob>) -> Result<SyncReport> {
    let incoming: Vec<NewJob> = raws
        .into_iter()
        .filter_map(|raw| normalize(raw, source))
        .collect();
    let relevant = incoming.len();

    let existing = load_existing(pool).await?;
    let plan = plan_sync(source, &existing, incoming);

    let inserted = insert_jobs(pool, &plan.inserts).await?;
    for (id, job) in plan.updates.iter().chain(plan.replacements.iter()) {
        update_job(pool, *id, job).await?;
    }
    let deleted = delete_jobs(pool, &plan.stale_ids).await?;

    Ok(SyncReport {
        source: source.to_string(),
        fetched: 0,
        relevant,
        inserted,
        updated: plan.updates.len(),
        replaced: plan.replacements.len(),
        unchanged: plan.unchanged,
        // conflicts on apply_url count as skipped too
        skipped: plan.skipped_duplicates + (plan.inserts.len() - inserted as usize),
        deleted,
        error: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::dedup::tests::{existing, new_job};

    const LEVER: &str = "lever:acme";

    #[test]
    fn test_new_jobs_are_inserted() {
        let plan = plan_sync(
            LEVER,
            &[],
            vec![new_job("Product Designer", "Acme", "https://jobs.lever.co/acme/1", LEVER)],
        );
        assert_eq!(plan.inserts.len(), 1);
        assert!(plan.stale_ids.is_empty());
    }

    #[test]
    fn test_same_url_unchanged_or_updated() {
        let rows = vec![
            existing("Product Designer", "Acme", "https://jobs.lever.co/acme/1", LEVER),
            existing("Brand Designer", "Acme", "https://jobs.lever.co/acme/2", LEVER),
        ];
        let mut changed = new_job("Brand Designer", "Acme", "https://jobs.lever.co/acme/2", LEVER);
        changed.description = "Now with motion work".to_string();

        let plan = plan_sync(
            LEVER,
            &rows,
            vec![
                new_job("Product Designer", "Acme", "https://jobs.lever.co/acme/1", LEVER),
                changed,
            ],
        );
        assert_eq!(plan.unchanged, 1);
        assert_eq!(plan.updates.len(), 1);
        assert_eq!(plan.updates[0].0, rows[1].id);
        assert!(plan.inserts.is_empty());
        assert!(plan.stale_ids.is_empty());
    }

    #[test]
    fn test_direct_posting_replaces_middleman_row() {
        let rows = vec![existing(
            "Product Designer",
            "Acme",
            "https://remoteok.com/remote-jobs/1",
            "remoteok",
        )];
        let plan = plan_sync(
            LEVER,
            &rows,
            vec![new_job("Product Designer", "Acme Inc", "https://jobs.lever.co/acme/1", LEVER)],
        );
        assert_eq!(plan.replacements.len(), 1);
        assert_eq!(plan.replacements[0].0, rows[0].id);
        assert!(plan.inserts.is_empty());
    }

    #[test]
    fn test_middleman_posting_skips_when_direct_exists() {
        let rows = vec![existing(
            "Product Designer",
            "Acme",
            "https://jobs.lever.co/acme/1",
            LEVER,
        )];
        let plan = plan_sync(
            "remoteok",
            &rows,
            vec![new_job("Product Designer", "Acme", "https://remoteok.com/remote-jobs/1", "remoteok")],
        );
        assert_eq!(plan.skipped_duplicates, 1);
        assert!(plan.inserts.is_empty());
        assert!(plan.replacements.is_empty());
    }

    #[test]
    fn test_same_source_url_change_replaces() {
        let rows = vec![existing("Product Designer", "Acme", "https://jobs.lever.co/acme/old", LEVER)];
        let plan = plan_sync(
            LEVER,
            &rows,
            vec![new_job("Product Designer", "Acme", "https://jobs.lever.co/acme/new", LEVER)],
        );
        assert_eq!(plan.replacements.len(), 1);
        assert!(plan.stale_ids.is_empty());
    }

    #[test]
    fn test_stale_rows_deleted_except_featured_and_other_sources() {
        let gone = existing("Brand Designer", "Acme", "https://jobs.lever.co/acme/2", LEVER);
        let mut featured = existing("Motion Designer", "Acme", "https://jobs.lever.co/acme/3", LEVER);
        featured.is_featured = true;
        let other = existing("UX Designer", "Beta", "https://beta.com/1", "greenhouse:beta");
        let kept = existing("Product Designer", "Acme", "https://jobs.lever.co/acme/1", LEVER);
        let rows = vec![gone.clone(), featured, other, kept];

        let plan = plan_sync(
            LEVER,
            &rows,
            vec![new_job("Product Designer", "Acme", "https://jobs.lever.co/acme/1", LEVER)],
        );
        assert_eq!(plan.stale_ids, vec![gone.id]);
    }

    #[test]
    fn test_empty_fetch_deletes_nothing() {
        let rows = vec![existing("Brand Designer", "Acme", "https://jobs.lever.co/acme/2", LEVER)];
        let plan = plan_sync(LEVER, &rows, vec![]);
        assert!(plan.stale_ids.is_empty());
    }

    #[test]
    fn test_batch_duplicates_are_counted() {
        let plan = plan_sync(
            "remotive",
            &[],
            vec![
                new_job("Product Designer", "Acme", "https://remotive.com/remote-jobs/1", "remotive"),
                new_job("Product Designer", "Acme", "https://remotive.com/remote-jobs/2", "remotive"),
            ],
        );
        assert_eq!(plan.inserts.len(), 1);
        assert_eq!(plan.skipped_duplicates, 1);
    }
}

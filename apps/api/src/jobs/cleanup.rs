//! cleanup-duplicates: collapse rows that different sources inserted for the
//! same job, keeping one per cluster.

use anyhow::Result;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::jobs::dedup::find_duplicate_clusters;
use crate::jobs::repository::{delete_jobs, load_existing};

#[derive(Debug, Default, Serialize)]
pub struct CleanupReport {
    pub scanned: usize,
    pub clusters: usize,
    pub deleted: u64,
}

pub async fn cleanup_duplicates(pool: &PgPool) -> Result<CleanupReport> {
    let rows = load_existing(pool).await?;
    let clusters = find_duplicate_clusters(&rows);

    let doomed: Vec<Uuid> = clusters
        .iter()
        .flat_map(|c| c.duplicates.iter().copied())
        .collect();
    let deleted = delete_jobs(pool, &doomed).await?;

    info!(
        "Duplicate cleanup: scanned={} clusters={} deleted={}",
        rows.len(),
        clusters.len(),
        deleted
    );

    Ok(CleanupReport {
        scanned: rows.len(),
        clusters: clusters.len(),
        deleted,
    })
}

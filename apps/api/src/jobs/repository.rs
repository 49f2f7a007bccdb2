//! All SQL against the `jobs` and `saved_jobs` tables.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::jobs::filters::{push_filters, JobFilter, LIST_ORDER};
use crate::models::job::{ExistingJob, JobRow, NewJob};

/// Rows per multi-row INSERT.
pub const INSERT_BATCH_SIZE: usize = 50;

const INSERT_COLUMNS: &str = "INSERT INTO jobs (title, company, company_logo, location, region, \
    job_type, experience_level, category, salary_min, salary_max, salary_currency, description, \
    apply_url, source, source_id, is_direct, posted_at) ";

// ────────────────────────────────────────────────────────────────────────────
// Sync and cleanup
// ────────────────────────────────────────────────────────────────────────────

pub async fn load_existing(pool: &PgPool) -> Result<Vec<ExistingJob>, sqlx::Error> {
    sqlx::query_as::<_, ExistingJob>(
        r#"
        SELECT id, title, company, location, description, salary_min, salary_max,
               apply_url, source, is_direct, is_featured, posted_at, created_at
        FROM jobs
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Inserts `jobs` in batches, skipping rows whose `apply_url` already exists.
/// Returns the number of rows actually inserted.
pub async fn insert_jobs(pool: &PgPool, jobs: &[NewJob]) -> Result<u64, sqlx::Error> {
    let mut inserted = 0;
    for batch in jobs.chunks(INSERT_BATCH_SIZE) {
        let mut qb = insert_query(batch);
        inserted += qb.build().execute(pool).await?.rows_affected();
    }
    Ok(inserted)
}

fn insert_query(batch: &[NewJob]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(INSERT_COLUMNS);
    qb.push_values(batch, |mut row, job| {
        row.push_bind(job.title.clone())
            .push_bind(job.company.clone())
            .push_bind(job.company_logo.clone())
            .push_bind(job.location.clone())
            .push_bind(job.region.clone())
            .push_bind(job.job_type.clone())
            .push_bind(job.experience_level.clone())
            .push_bind(job.category.clone())
            .push_bind(job.salary_min)
            .push_bind(job.salary_max)
            .push_bind(job.salary_currency.clone())
            .push_bind(job.description.clone())
            .push_bind(job.apply_url.clone())
            .push_bind(job.source.clone())
            .push_bind(job.source_id.clone())
            .push_bind(job.is_direct)
            .push_bind(job.posted_at);
    });
    qb.push(" ON CONFLICT (apply_url) DO NOTHING");
    qb
}

/// Overwrites every synced column of an existing row. Featured and tweeted
/// state are left alone.
pub async fn update_job(pool: &PgPool, id: Uuid, job: &NewJob) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE jobs SET
            title = $2, company = $3, company_logo = $4, location = $5, region = $6,
            job_type = $7, experience_level = $8, category = $9, salary_min = $10,
            salary_max = $11, salary_currency = $12, description = $13, apply_url = $14,
            source = $15, source_id = $16, is_direct = $17, posted_at = $18,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&job.title)
    .bind(&job.company)
    .bind(&job.company_logo)
    .bind(&job.location)
    .bind(&job.region)
    .bind(&job.job_type)
    .bind(&job.experience_level)
    .bind(&job.category)
    .bind(job.salary_min)
    .bind(job.salary_max)
    .bind(&job.salary_currency)
    .bind(&job.description)
    .bind(&job.apply_url)
    .bind(&job.source)
    .bind(&job.source_id)
    .bind(job.is_direct)
    .bind(job.posted_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_jobs(pool: &PgPool, ids: &[Uuid]) -> Result<u64, sqlx::Error> {
    if ids.is_empty() {
        return Ok(0);
    }
    let result = sqlx::query("DELETE FROM jobs WHERE id = ANY($1)")
        .bind(ids)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Deletes non-featured jobs posted more than `max_age_days` ago.
pub async fn expire_old_jobs(pool: &PgPool, max_age_days: i64) -> Result<u64, sqlx::Error> {
    let cutoff = Utc::now() - Duration::days(max_age_days);
    let result = sqlx::query("DELETE FROM jobs WHERE posted_at < $1 AND NOT is_featured")
        .bind(cutoff)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// ────────────────────────────────────────────────────────────────────────────
// Browsing
// ────────────────────────────────────────────────────────────────────────────

/// One page of jobs matching `filter`, plus the total match count.
pub async fn list_jobs(
    pool: &PgPool,
    filter: &JobFilter,
) -> Result<(Vec<JobRow>, i64), sqlx::Error> {
    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs");
    push_filters(&mut count_qb, filter);
    let total = count_qb
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
    push_filters(&mut qb, filter);
    qb.push(LIST_ORDER)
        .push(" LIMIT ")
        .push_bind(filter.per_page())
        .push(" OFFSET ")
        .push_bind(filter.offset());
    let jobs = qb.build_query_as::<JobRow>().fetch_all(pool).await?;

    Ok((jobs, total))
}

pub async fn get_job(pool: &PgPool, id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Other jobs in the same category, best first.
pub async fn related_jobs(
    pool: &PgPool,
    job: &JobRow,
    limit: i64,
) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        SELECT * FROM jobs
        WHERE category = $1 AND id <> $2
        ORDER BY is_featured DESC, posted_at DESC
        LIMIT $3
        "#,
    )
    .bind(&job.category)
    .bind(job.id)
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Jobs posted after `since` that match a subscriber's preferences. Empty
/// preference lists match everything.
pub async fn jobs_posted_since(
    pool: &PgPool,
    since: DateTime<Utc>,
    job_types: &[String],
    regions: &[String],
    limit: i64,
) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        SELECT * FROM jobs
        WHERE posted_at > $1
          AND (cardinality($2::text[]) = 0 OR job_type = ANY($2))
          AND (cardinality($3::text[]) = 0 OR region = ANY($3))
        ORDER BY is_featured DESC, posted_at DESC
        LIMIT $4
        "#,
    )
    .bind(since)
    .bind(job_types)
    .bind(regions)
    .bind(limit)
    .fetch_all(pool)
    .await
}

#[derive(Debug, Serialize, FromRow)]
pub struct CountRow {
    pub key: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct JobStats {
    pub total: i64,
    pub direct: i64,
    pub by_category: Vec<CountRow>,
    pub by_region: Vec<CountRow>,
    pub by_job_type: Vec<CountRow>,
}

async fn count_by(pool: &PgPool, column: &str) -> Result<Vec<CountRow>, sqlx::Error> {
    // column is one of a fixed set, never user input
    let sql = format!(
        "SELECT {column} AS key, COUNT(*) AS count FROM jobs GROUP BY {column} ORDER BY count DESC, key"
    );
    sqlx::query_as::<_, CountRow>(&sql).fetch_all(pool).await
}

pub async fn job_stats(pool: &PgPool) -> Result<JobStats, sqlx::Error> {
    let (total, direct): (i64, i64) =
        sqlx::query_as("SELECT COUNT(*), COUNT(*) FILTER (WHERE is_direct) FROM jobs")
            .fetch_one(pool)
            .await?;

    Ok(JobStats {
        total,
        direct,
        by_category: count_by(pool, "category").await?,
        by_region: count_by(pool, "region").await?,
        by_job_type: count_by(pool, "job_type").await?,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Saved jobs
// ────────────────────────────────────────────────────────────────────────────

pub async fn list_saved_jobs(pool: &PgPool, user_id: Uuid) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>(
        r#"
        SELECT j.* FROM jobs j
        JOIN saved_jobs s ON s.job_id = j.id
        WHERE s.user_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Returns true when a new bookmark was created.
pub async fn save_job(pool: &PgPool, user_id: Uuid, job_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO saved_jobs (user_id, job_id) VALUES ($1, $2) ON CONFLICT (user_id, job_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(job_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn unsave_job(pool: &PgPool, user_id: Uuid, job_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
        .bind(user_id)
        .bind(job_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::dedup::tests::new_job;

    #[test]
    fn test_insert_query_shape() {
        let jobs = vec![
            new_job("Product Designer", "Acme", "https://acme.com/1", "s"),
            new_job("Brand Designer", "Acme", "https://acme.com/2", "s"),
        ];
        let qb = insert_query(&jobs);
        let sql = qb.sql();
        assert!(sql.starts_with("INSERT INTO jobs (title, company,"));
        assert!(sql.contains("($18, $19,"));
        assert!(sql.ends_with("$34) ON CONFLICT (apply_url) DO NOTHING"));
    }
}

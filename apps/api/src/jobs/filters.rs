//! Query filters shared by the job list, landing pages and alert digests.

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use crate::errors::AppError;
use crate::jobs::normalize::{CATEGORIES, EXPERIENCE_LEVELS, JOB_TYPES, REGIONS};

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;
/// Deeper pages are served as this one; keeps OFFSET arithmetic in range.
pub const MAX_PAGE: i64 = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFilter {
    pub q: Option<String>,
    pub job_type: Option<String>,
    pub region: Option<String>,
    pub experience_level: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub featured_only: bool,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl JobFilter {
    /// Rejects enum-valued fields outside the classifier vocabularies.
    pub fn validate(&self) -> Result<(), AppError> {
        check_vocab("job_type", self.job_type.as_deref(), JOB_TYPES)?;
        check_vocab("region", self.region.as_deref(), REGIONS)?;
        check_vocab(
            "experience_level",
            self.experience_level.as_deref(),
            EXPERIENCE_LEVELS,
        )?;
        check_vocab("category", self.category.as_deref(), CATEGORIES)?;
        Ok(())
    }

    /// 1-based page number.
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).clamp(1, MAX_PAGE)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }

    fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

fn check_vocab(field: &str, value: Option<&str>, allowed: &[&str]) -> Result<(), AppError> {
    match value {
        Some(v) if !allowed.contains(&v) => Err(AppError::Validation(format!(
            "Invalid {field} '{v}'. Expected one of: {}",
            allowed.join(", ")
        ))),
        _ => Ok(()),
    }
}

/// `%term%` for ILIKE with the LIKE wildcards in `term` escaped.
pub fn search_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Appends ` WHERE …` for `filter` to a query over `jobs`.
pub fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &JobFilter) {
    qb.push(" WHERE TRUE");

    if let Some(term) = filter.search_term() {
        let pattern = search_pattern(term);
        qb.push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(v) = &filter.job_type {
        qb.push(" AND job_type = ").push_bind(v.clone());
    }
    if let Some(v) = &filter.region {
        qb.push(" AND region = ").push_bind(v.clone());
    }
    if let Some(v) = &filter.experience_level {
        qb.push(" AND experience_level = ").push_bind(v.clone());
    }
    if let Some(v) = &filter.category {
        qb.push(" AND category = ").push_bind(v.clone());
    }
    if filter.featured_only {
        qb.push(" AND is_featured");
    }
}

pub const LIST_ORDER: &str = " ORDER BY is_featured DESC, posted_at DESC, id";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_page_defaults_and_clamps() {
        assert_eq!(JobFilter::default().per_page(), 20);
        let f = JobFilter {
            per_page: Some(500),
            ..Default::default()
        };
        assert_eq!(f.per_page(), 100);
        let f = JobFilter {
            per_page: Some(0),
            page: Some(-3),
            ..Default::default()
        };
        assert_eq!((f.per_page(), f.page(), f.offset()), (1, 1, 0));
    }

    #[test]
    fn test_huge_page_is_capped() {
        let f = JobFilter {
            page: Some(i64::MAX),
            per_page: Some(i64::MAX),
            ..Default::default()
        };
        assert_eq!(f.page(), MAX_PAGE);
        assert_eq!(f.offset(), (MAX_PAGE - 1) * MAX_PER_PAGE);
    }

    #[test]
    fn test_offset_uses_page() {
        let f = JobFilter {
            page: Some(3),
            per_page: Some(25),
            ..Default::default()
        };
        assert_eq!(f.offset(), 50);
    }

    #[test]
    fn test_validate_rejects_unknown_region() {
        let f = JobFilter {
            region: Some("mars".to_string()),
            ..Default::default()
        };
        assert!(matches!(f.validate(), Err(AppError::Validation(_))));

        let f = JobFilter {
            region: Some("europe".to_string()),
            job_type: Some("contract".to_string()),
            ..Default::default()
        };
        assert!(f.validate().is_ok());
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        assert_eq!(search_pattern("100%_ui"), "%100\\%\\_ui%");
    }

    #[test]
    fn test_push_filters_binds_in_order() {
        let f = JobFilter {
            q: Some("  figma ".to_string()),
            region: Some("europe".to_string()),
            featured_only: true,
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM jobs");
        push_filters(&mut qb, &f);
        assert_eq!(
            qb.sql(),
            "SELECT * FROM jobs WHERE TRUE AND (title ILIKE $1 OR company ILIKE $2) AND region = $3 AND is_featured"
        );
    }

    #[test]
    fn test_blank_query_is_ignored() {
        let f = JobFilter {
            q: Some("   ".to_string()),
            ..Default::default()
        };
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM jobs");
        push_filters(&mut qb, &f);
        assert_eq!(qb.sql(), "SELECT 1 FROM jobs WHERE TRUE");
    }
}

//! Duplicate detection for jobs that reach the board through more than one source.
//!
//! Two postings are the same job when their canonical apply URLs match, or when
//! their dedup keys (normalized title + company) match.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::jobs::normalize::canonicalize_url;
use crate::models::job::{ExistingJob, NewJob};

/// Trailing company words that differ between sources for the same employer.
const LEGAL_SUFFIXES: &[&str] = &[
    "inc",
    "incorporated",
    "llc",
    "ltd",
    "limited",
    "gmbh",
    "co",
    "corp",
    "corporation",
    "plc",
    "sa",
    "ag",
    "bv",
    "oy",
    "ab",
    "pty",
];

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}

/// `"{title}|{company}"` with casing, punctuation, remote markers and legal
/// suffixes removed.
pub fn dedup_key(title: &str, company: &str) -> String {
    let title: Vec<String> = words(title).into_iter().filter(|w| w != "remote").collect();

    let mut company = words(company);
    while company.len() > 1
        && company
            .last()
            .map(|w| LEGAL_SUFFIXES.contains(&w.as_str()))
            .unwrap_or(false)
    {
        company.pop();
    }

    format!("{}|{}", title.join(" "), company.join(" "))
}

fn url_key(apply_url: &str) -> String {
    canonicalize_url(apply_url).unwrap_or_else(|| apply_url.to_string())
}

/// Collapses duplicates inside one fetched batch. When two postings collide the
/// direct one wins, otherwise the first seen. Returns the survivors and the
/// number dropped.
pub fn dedupe_batch(jobs: Vec<NewJob>) -> (Vec<NewJob>, usize) {
    let mut kept: Vec<NewJob> = Vec::with_capacity(jobs.len());
    let mut by_url: HashMap<String, usize> = HashMap::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();
    let mut dropped = 0;

    for job in jobs {
        let key = dedup_key(&job.title, &job.company);
        let existing = by_url
            .get(&job.apply_url)
            .or_else(|| by_key.get(&key))
            .copied();

        match existing {
            Some(idx) => {
                dropped += 1;
                if job.is_direct && !kept[idx].is_direct {
                    by_url.insert(job.apply_url.clone(), idx);
                    kept[idx] = job;
                }
            }
            None => {
                by_url.insert(job.apply_url.clone(), kept.len());
                by_key.insert(key, kept.len());
                kept.push(job);
            }
        }
    }

    (kept, dropped)
}

/// Ordering for which row of a duplicate cluster survives: featured first, then
/// direct, then the most recently posted, then the oldest row.
fn keeper_order(a: &ExistingJob, b: &ExistingJob) -> Ordering {
    b.is_featured
        .cmp(&a.is_featured)
        .then(b.is_direct.cmp(&a.is_direct))
        .then(b.posted_at.cmp(&a.posted_at))
        .then(a.created_at.cmp(&b.created_at))
        .then(a.id.cmp(&b.id))
}

/// Index of the row to keep within a cluster. `None` for an empty slice.
pub fn pick_keeper(cluster: &[&ExistingJob]) -> Option<usize> {
    (0..cluster.len()).min_by(|&a, &b| keeper_order(cluster[a], cluster[b]))
}

struct UnionFind {
    parent: Vec<usize>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

/// One group of stored rows that describe the same job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateCluster {
    pub keeper: Uuid,
    pub duplicates: Vec<Uuid>,
}

/// Rows are linked when they share a canonical URL or a dedup key, transitively.
/// Returns index groups with two or more rows.
fn cluster_indices(jobs: &[ExistingJob]) -> Vec<Vec<usize>> {
    let mut uf = UnionFind::new(jobs.len());
    let mut first_by_url: HashMap<String, usize> = HashMap::new();
    let mut first_by_key: HashMap<String, usize> = HashMap::new();

    for (i, job) in jobs.iter().enumerate() {
        let url = url_key(&job.apply_url);
        match first_by_url.get(&url) {
            Some(&j) => uf.union(j, i),
            None => {
                first_by_url.insert(url, i);
            }
        }
        let key = dedup_key(&job.title, &job.company);
        match first_by_key.get(&key) {
            Some(&j) => uf.union(j, i),
            None => {
                first_by_key.insert(key, i);
            }
        }
    }

    let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
    for i in 0..jobs.len() {
        let root = uf.find(i);
        groups.entry(root).or_default().push(i);
    }

    let mut result: Vec<Vec<usize>> = groups.into_values().filter(|c| c.len() > 1).collect();
    result.sort_by_key(|c| c[0]);
    result
}

/// Groups stored jobs into duplicate clusters and picks the survivor of each.
pub fn find_duplicate_clusters(jobs: &[ExistingJob]) -> Vec<DuplicateCluster> {
    cluster_indices(jobs)
        .into_iter()
        .filter_map(|indices| {
            let rows: Vec<&ExistingJob> = indices.iter().map(|&i| &jobs[i]).collect();
            let keep = pick_keeper(&rows)?;
            Some(DuplicateCluster {
                keeper: rows[keep].id,
                duplicates: rows
                    .iter()
                    .enumerate()
                    .filter(|(pos, _)| *pos != keep)
                    .map(|(_, row)| row.id)
                    .collect(),
            })
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    pub(crate) fn existing(title: &str, company: &str, url: &str, source: &str) -> ExistingJob {
        let now = Utc::now();
        ExistingJob {
            id: Uuid::new_v4(),
            title: title.to_string(),
            company: company.to_string(),
            location: Some("Remote".to_string()),
            description: "Design things".to_string(),
            salary_min: None,
            salary_max: None,
            apply_url: url.to_string(),
            source: source.to_string(),
            is_direct: !url.contains("remoteok") && !url.contains("remotive"),
            is_featured: false,
            posted_at: now,
            created_at: now,
        }
    }

    pub(crate) fn new_job(title: &str, company: &str, url: &str, source: &str) -> NewJob {
        NewJob {
            title: title.to_string(),
            company: company.to_string(),
            company_logo: None,
            location: Some("Remote".to_string()),
            region: "worldwide".to_string(),
            job_type: "full_time".to_string(),
            experience_level: "mid".to_string(),
            category: "product_design".to_string(),
            salary_min: None,
            salary_max: None,
            salary_currency: None,
            description: "Design things".to_string(),
            apply_url: url.to_string(),
            source: source.to_string(),
            source_id: None,
            is_direct: !url.contains("remoteok") && !url.contains("remotive"),
            posted_at: Utc::now(),
        }
    }

    #[test]
    fn test_dedup_key_ignores_case_punctuation_and_suffixes() {
        assert_eq!(
            dedup_key("Senior Product Designer (Remote)", "Acme, Inc."),
            dedup_key("senior product designer", "ACME")
        );
        assert_eq!(
            dedup_key("Product Designer - Remote", "Acme GmbH"),
            "product designer|acme"
        );
    }

    #[test]
    fn test_dedup_key_keeps_single_word_company() {
        // a company literally named "Co" must not collapse to empty
        assert_eq!(dedup_key("Designer", "Co"), "designer|co");
    }

    #[test]
    fn test_dedupe_batch_prefers_direct() {
        let jobs = vec![
            new_job("Product Designer", "Acme", "https://remoteok.com/remote-jobs/1", "remoteok"),
            new_job("Product Designer", "Acme Inc", "https://jobs.lever.co/acme/1", "remoteok"),
            new_job("Brand Designer", "Acme", "https://jobs.lever.co/acme/2", "remoteok"),
        ];
        let (kept, dropped) = dedupe_batch(jobs);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].apply_url, "https://jobs.lever.co/acme/1");
    }

    #[test]
    fn test_dedupe_batch_same_url() {
        let jobs = vec![
            new_job("Product Designer", "Acme", "https://jobs.lever.co/acme/1", "s"),
            new_job("Product Designer II", "Acme", "https://jobs.lever.co/acme/1", "s"),
        ];
        let (kept, dropped) = dedupe_batch(jobs);
        assert_eq!((kept.len(), dropped), (1, 1));
        assert_eq!(kept[0].title, "Product Designer");
    }

    #[test]
    fn test_pick_keeper_priority() {
        let mut featured = existing("Designer", "Acme", "https://remoteok.com/remote-jobs/1", "remoteok");
        featured.is_featured = true;
        let direct = existing("Designer", "Acme", "https://jobs.lever.co/acme/1", "lever:acme");
        assert_eq!(pick_keeper(&[&direct, &featured]), Some(1));

        let mut newer = existing("Designer", "Acme", "https://acme.com/jobs/2", "s");
        newer.posted_at = direct.posted_at + Duration::days(1);
        assert_eq!(pick_keeper(&[&direct, &newer]), Some(1));

        let mut older_row = existing("Designer", "Acme", "https://acme.com/jobs/3", "s");
        older_row.posted_at = direct.posted_at;
        older_row.created_at = direct.created_at - Duration::hours(1);
        assert_eq!(pick_keeper(&[&direct, &older_row]), Some(1));

        assert_eq!(pick_keeper(&[]), None);
    }

    #[test]
    fn test_clusters_link_transitively() {
        let jobs = vec![
            existing("Product Designer", "Acme", "https://jobs.lever.co/acme/1", "lever:acme"),
            existing("Product Designer (Remote)", "Acme Inc", "https://remoteok.com/remote-jobs/9", "remoteok"),
            // same URL as row 1 under a different title
            existing("Designer, Product", "Acme", "https://remoteok.com/remote-jobs/9", "remotive"),
            existing("Brand Designer", "Other", "https://other.com/1", "s"),
        ];
        assert_eq!(cluster_indices(&jobs), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_clusters_keep_direct_row() {
        let jobs = vec![
            existing("Product Designer", "Acme", "https://remoteok.com/remote-jobs/1", "remoteok"),
            existing("Product Designer", "Acme", "https://jobs.lever.co/acme/1", "lever:acme"),
            existing("Brand Designer", "Acme", "https://jobs.lever.co/acme/2", "lever:acme"),
        ];
        let clusters = find_duplicate_clusters(&jobs);
        assert_eq!(
            clusters,
            vec![DuplicateCluster {
                keeper: jobs[1].id,
                duplicates: vec![jobs[0].id],
            }]
        );
    }
}

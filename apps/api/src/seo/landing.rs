//! Programmatic SEO landing pages: one page per value of each job dimension,
//! e.g. `/remote-design-jobs/type/full-time` or `/remote-design-jobs/region/europe`.
//!
//! URL values are the vocabulary values with `_` replaced by `-`.

use serde::Serialize;

use crate::jobs::filters::JobFilter;
use crate::jobs::normalize::{CATEGORIES, EXPERIENCE_LEVELS, JOB_TYPES, REGIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    JobType,
    Region,
    Level,
    Category,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::JobType,
        Dimension::Region,
        Dimension::Level,
        Dimension::Category,
    ];

    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "type" => Some(Dimension::JobType),
            "region" => Some(Dimension::Region),
            "level" => Some(Dimension::Level),
            "category" => Some(Dimension::Category),
            _ => None,
        }
    }

    pub fn segment(self) -> &'static str {
        match self {
            Dimension::JobType => "type",
            Dimension::Region => "region",
            Dimension::Level => "level",
            Dimension::Category => "category",
        }
    }

    fn values(self) -> &'static [&'static str] {
        match self {
            Dimension::JobType => JOB_TYPES,
            Dimension::Region => REGIONS,
            Dimension::Level => EXPERIENCE_LEVELS,
            Dimension::Category => CATEGORIES,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LandingPage {
    /// Path below the landing root, e.g. `region/north-america`.
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(skip)]
    pub filter: JobFilter,
}

fn label(value: &str) -> &'static str {
    match value {
        "full_time" => "Full-Time",
        "part_time" => "Part-Time",
        "contract" => "Contract",
        "freelance" => "Freelance",
        "internship" => "Internship",
        "worldwide" => "Worldwide",
        "north_america" => "North America",
        "europe" => "Europe",
        "latin_america" => "Latin America",
        "asia_pacific" => "Asia-Pacific",
        "africa" => "Africa",
        "entry" => "Entry-Level",
        "mid" => "Mid-Level",
        "senior" => "Senior",
        "lead" => "Lead",
        "product_design" => "Product Design",
        "ux_ui" => "UX/UI Design",
        "graphic_brand" => "Graphic & Brand Design",
        "motion" => "Motion Design",
        "research" => "UX Research",
        "leadership" => "Design Leadership",
        "design_engineering" => "Design Engineering",
        "content_design" => "Content Design",
        _ => "Design",
    }
}

fn build_page(dimension: Dimension, value: &'static str) -> LandingPage {
    let l = label(value);
    let mut filter = JobFilter::default();

    let (title, description) = match dimension {
        Dimension::JobType => {
            filter.job_type = Some(value.to_string());
            (
                format!("Remote {l} Design Jobs"),
                format!("Browse {} remote design jobs at companies hiring now. Updated every few hours.", l.to_lowercase()),
            )
        }
        Dimension::Region => {
            filter.region = Some(value.to_string());
            let title = if value == "worldwide" {
                "Remote Design Jobs You Can Do From Anywhere".to_string()
            } else {
                format!("Remote Design Jobs in {l}")
            };
            (
                title,
                format!("Remote design roles open to candidates in {l}, collected from company career pages."),
            )
        }
        Dimension::Level => {
            filter.experience_level = Some(value.to_string());
            (
                format!("{l} Remote Design Jobs"),
                format!("{l} remote design roles, from product design to research and brand."),
            )
        }
        Dimension::Category => {
            filter.category = Some(value.to_string());
            (
                format!("Remote {l} Jobs"),
                format!("The latest remote {l} jobs, linked straight to the hiring company where possible."),
            )
        }
    };

    LandingPage {
        slug: format!("{}/{}", dimension.segment(), value.replace('_', "-")),
        title,
        description,
        filter,
    }
}

/// Looks up the landing page for a URL pair such as (`region`, `north-america`).
pub fn resolve_landing(dimension: &str, value: &str) -> Option<LandingPage> {
    let dimension = Dimension::from_segment(dimension)?;
    let wanted = value.to_lowercase().replace('-', "_");
    let value = dimension.values().iter().find(|v| **v == wanted)?;
    Some(build_page(dimension, value))
}

pub fn all_landing_pages() -> Vec<LandingPage> {
    Dimension::ALL
        .iter()
        .flat_map(|d| d.values().iter().map(move |v| build_page(*d, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_region_page() {
        let page = resolve_landing("region", "north-america").unwrap();
        assert_eq!(page.slug, "region/north-america");
        assert_eq!(page.title, "Remote Design Jobs in North America");
        assert_eq!(page.filter.region.as_deref(), Some("north_america"));
        assert!(page.filter.job_type.is_none());
    }

    #[test]
    fn test_resolve_type_page_case_insensitive() {
        let page = resolve_landing("type", "Full-Time").unwrap();
        assert_eq!(page.title, "Remote Full-Time Design Jobs");
        assert_eq!(page.filter.job_type.as_deref(), Some("full_time"));
    }

    #[test]
    fn test_unknown_dimension_or_value() {
        assert!(resolve_landing("salary", "high").is_none());
        assert!(resolve_landing("region", "antarctica").is_none());
    }

    #[test]
    fn test_all_landing_pages_cover_every_value() {
        let pages = all_landing_pages();
        let expected = JOB_TYPES.len() + REGIONS.len() + EXPERIENCE_LEVELS.len() + CATEGORIES.len();
        assert_eq!(pages.len(), expected);
        assert!(pages.iter().any(|p| p.slug == "category/ux-ui"));
        assert!(pages.iter().all(|p| p.filter.validate().is_ok()));
    }
}

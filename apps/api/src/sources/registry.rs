//! The fixed list of boards polled on every sync.

use std::sync::Arc;

use super::ashby::AshbySource;
use super::greenhouse::GreenhouseSource;
use super::lever::LeverSource;
use super::remoteok::RemoteOkSource;
use super::remotive::RemotiveSource;
use super::workable::WorkableSource;
use super::JobSource;

/// (board token, display name)
const GREENHOUSE_BOARDS: &[(&str, &str)] = &[
    ("figma", "Figma"),
    ("airbnb", "Airbnb"),
    ("dropbox", "Dropbox"),
    ("gitlab", "GitLab"),
    ("webflow", "Webflow"),
    ("duolingo", "Duolingo"),
    ("automatticcareers", "Automattic"),
    ("canva", "Canva"),
];

const LEVER_COMPANIES: &[(&str, &str)] = &[
    ("spotify", "Spotify"),
    ("netlify", "Netlify"),
    ("zapier", "Zapier"),
    ("buffer", "Buffer"),
];

const ASHBY_ORGS: &[(&str, &str)] = &[
    ("linear", "Linear"),
    ("notion", "Notion"),
    ("vercel", "Vercel"),
    ("ramp", "Ramp"),
    ("raycast", "Raycast"),
];

const WORKABLE_ACCOUNTS: &[(&str, &str)] = &[("hotjar", "Hotjar"), ("toggl", "Toggl")];

/// Every configured source, ATS boards first.
pub fn all_sources() -> Vec<Arc<dyn JobSource>> {
    let mut sources: Vec<Arc<dyn JobSource>> = Vec::new();

    for (token, company) in GREENHOUSE_BOARDS {
        sources.push(Arc::new(GreenhouseSource::new(token, company)));
    }
    for (slug, company) in LEVER_COMPANIES {
        sources.push(Arc::new(LeverSource::new(slug, company)));
    }
    for (org, company) in ASHBY_ORGS {
        sources.push(Arc::new(AshbySource::new(org, company)));
    }
    for (account, company) in WORKABLE_ACCOUNTS {
        sources.push(Arc::new(WorkableSource::new(account, company)));
    }

    sources.push(Arc::new(RemotiveSource));
    sources.push(Arc::new(RemoteOkSource));
    sources
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_source_names_are_unique() {
        let sources = all_sources();
        let names: HashSet<&str> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(names.len(), sources.len());
        assert!(names.contains("remotive"));
        assert!(names.contains("greenhouse:figma"));
    }
}

//! Field normalization for aggregated jobs.
//!
//! Pure functions only: every source adapter hands over a `RawJob`, and
//! `normalize()` decides whether it belongs on the board and what it looks like
//! once it does. All the string-matching business rules live here.

use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use scraper::Html;
use url::Url;

use crate::models::job::NewJob;
use crate::sources::RawJob;

pub const JOB_TYPES: &[&str] = &["full_time", "part_time", "contract", "freelance", "internship"];
pub const EXPERIENCE_LEVELS: &[&str] = &["entry", "mid", "senior", "lead"];
pub const REGIONS: &[&str] = &[
    "worldwide",
    "north_america",
    "europe",
    "latin_america",
    "asia_pacific",
    "africa",
];
pub const CATEGORIES: &[&str] = &[
    "product_design",
    "ux_ui",
    "graphic_brand",
    "motion",
    "research",
    "leadership",
    "design_engineering",
    "content_design",
];

lazy_static! {
    static ref SCRIPT_STYLE: Regex =
        Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").unwrap();
    static ref LIST_ITEM: Regex = Regex::new(r"(?i)<li[^>]*>").unwrap();
    static ref BLOCK_BREAK: Regex =
        Regex::new(r"(?i)<br\s*/?>|</(p|div|li|h[1-6]|ul|ol|tr|section|blockquote)>").unwrap();
    static ref SALARY_AMOUNT: Regex =
        Regex::new(r"(?i)(\d{1,3}(?:[,.]\d{3})+|\d+(?:\.\d+)?)\s*(k)?").unwrap();
}

// ────────────────────────────────────────────────────────────────────────────
// Text helpers
// ────────────────────────────────────────────────────────────────────────────

/// Converts an HTML description to plain text.
///
/// Block-level closers become line breaks, list items get a bullet, entities are
/// decoded, and blank lines are dropped. Greenhouse sends entity-escaped HTML
/// (`&lt;p&gt;`), which is unescaped once before tag handling.
pub fn strip_html(input: &str) -> String {
    let html = if !input.contains('<') && input.contains("&lt;") {
        decode_entities(input)
    } else {
        input.to_string()
    };

    let html = SCRIPT_STYLE.replace_all(&html, "");
    let html = LIST_ITEM.replace_all(&html, "\n• ");
    let html = BLOCK_BREAK.replace_all(&html, "\n");
    let text = decode_entities(&html);

    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses `input` as an HTML fragment and returns its text nodes concatenated.
fn decode_entities(input: &str) -> String {
    Html::parse_fragment(input).root_element().text().collect()
}

/// Lowercases and splits on anything that is not alphanumeric, padded with spaces
/// so phrase lookups can match whole words via `contains(" term ")`.
fn padded_terms(text: &str) -> String {
    let words: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect();
    format!(" {} ", words.join(" "))
}

fn has_term(padded: &str, term: &str) -> bool {
    padded.contains(&format!(" {term} "))
}

fn has_any(padded: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| has_term(padded, t))
}

// ────────────────────────────────────────────────────────────────────────────
// Classification
// ────────────────────────────────────────────────────────────────────────────

const DESIGN_TERMS: &[&str] = &[
    "design",
    "designer",
    "designers",
    "ux",
    "ui",
    "illustrator",
    "animator",
    "user experience",
    "user research",
    "user researcher",
    "art director",
    "creative director",
    "motion graphics",
];

const ENGINEERING_TERMS: &[&str] = &["engineer", "engineering", "developer"];

const DESIGN_ENGINEERING_TERMS: &[&str] = &[
    "design engineer",
    "ux engineer",
    "ui engineer",
    "design technologist",
    "design engineering",
];

const NON_PRODUCT_DESIGN_TERMS: &[&str] = &[
    "hardware",
    "chip",
    "asic",
    "fpga",
    "circuit",
    "pcb",
    "verification",
    "interior",
    "civil",
    "mechanical",
    "electrical",
    "instructional",
    "recruiter",
    "sales",
    "designated",
];

/// True when a title reads like a digital design role.
pub fn is_design_role(title: &str) -> bool {
    let terms = padded_terms(title);
    if !has_any(&terms, DESIGN_TERMS) {
        return false;
    }
    if has_any(&terms, NON_PRODUCT_DESIGN_TERMS) {
        return false;
    }
    if has_any(&terms, ENGINEERING_TERMS) {
        return has_any(&terms, DESIGN_ENGINEERING_TERMS);
    }
    true
}

pub fn classify_category(title: &str) -> &'static str {
    let t = padded_terms(title);

    let is_leadership = has_any(&t, &["head", "vp", "chief", "manager"])
        || (has_term(&t, "director") && !has_any(&t, &["art director", "creative director"]));

    if is_leadership {
        "leadership"
    } else if has_any(&t, DESIGN_ENGINEERING_TERMS) || has_any(&t, ENGINEERING_TERMS) {
        "design_engineering"
    } else if has_any(&t, &["research", "researcher"]) {
        "research"
    } else if has_any(&t, &["content design", "content designer", "writer", "content strategist"]) {
        "content_design"
    } else if has_any(&t, &["motion", "animator", "animation"]) {
        "motion"
    } else if has_any(
        &t,
        &[
            "brand",
            "graphic",
            "visual",
            "illustrator",
            "marketing designer",
            "communication designer",
            "art director",
            "creative director",
        ],
    ) {
        "graphic_brand"
    } else if has_any(&t, &["ux", "ui", "interaction", "user experience", "web designer"]) {
        "ux_ui"
    } else {
        "product_design"
    }
}

/// Resolves employment type from the source's hint (any casing or separator:
/// `FullTime`, `Full-time`, `full_time`) and falls back to the title.
pub fn classify_job_type(hint: Option<&str>, title: &str) -> &'static str {
    if let Some(hint) = hint {
        let h = hint.to_lowercase();
        if h.contains("intern") {
            return "internship";
        } else if h.contains("freelance") {
            return "freelance";
        } else if h.contains("contract") || h.contains("temp") {
            return "contract";
        } else if h.contains("part") {
            return "part_time";
        } else if h.contains("full") || h.contains("permanent") {
            return "full_time";
        }
    }

    let t = padded_terms(title);
    if has_any(&t, &["intern", "internship", "interns"]) {
        "internship"
    } else if has_term(&t, "freelance") {
        "freelance"
    } else if has_any(&t, &["contract", "contractor"]) {
        "contract"
    } else if has_any(&t, &["part time", "parttime"]) {
        "part_time"
    } else {
        "full_time"
    }
}

pub fn classify_experience(title: &str) -> &'static str {
    let t = padded_terms(title);
    if has_any(
        &t,
        &["lead", "principal", "staff", "head", "director", "vp", "manager", "chief"],
    ) {
        "lead"
    } else if has_any(&t, &["senior", "sr", "iii"]) {
        "senior"
    } else if has_any(
        &t,
        &["intern", "internship", "junior", "jr", "entry", "associate", "graduate", "apprentice"],
    ) {
        "entry"
    } else {
        "mid"
    }
}

const NORTH_AMERICA: &[&str] = &[
    "us",
    "usa",
    "u s",
    "united states",
    "north america",
    "americas",
    "canada",
    "new york",
    "nyc",
    "san francisco",
    "sf",
    "seattle",
    "austin",
    "boston",
    "chicago",
    "los angeles",
    "toronto",
    "vancouver",
    "est",
    "pst",
];

const EUROPE: &[&str] = &[
    "europe",
    "eu",
    "emea",
    "uk",
    "united kingdom",
    "england",
    "london",
    "germany",
    "berlin",
    "france",
    "paris",
    "spain",
    "madrid",
    "barcelona",
    "netherlands",
    "amsterdam",
    "portugal",
    "lisbon",
    "ireland",
    "dublin",
    "poland",
    "sweden",
    "stockholm",
    "denmark",
    "norway",
    "finland",
    "italy",
    "switzerland",
    "austria",
    "belgium",
    "cet",
    "gmt",
];

const LATIN_AMERICA: &[&str] = &[
    "latam",
    "latin america",
    "south america",
    "brazil",
    "mexico",
    "argentina",
    "colombia",
    "chile",
    "peru",
];

const ASIA_PACIFIC: &[&str] = &[
    "apac",
    "asia",
    "australia",
    "new zealand",
    "india",
    "singapore",
    "japan",
    "philippines",
    "indonesia",
    "vietnam",
    "sydney",
    "melbourne",
    "bangalore",
];

const AFRICA: &[&str] = &["africa", "nigeria", "kenya", "egypt", "ghana"];

pub fn classify_region(location: Option<&str>) -> &'static str {
    let Some(location) = location else {
        return "worldwide";
    };
    let t = padded_terms(location);
    if has_any(&t, AFRICA) {
        "africa"
    } else if has_any(&t, LATIN_AMERICA) {
        "latin_america"
    } else if has_any(&t, NORTH_AMERICA) {
        "north_america"
    } else if has_any(&t, EUROPE) {
        "europe"
    } else if has_any(&t, ASIA_PACIFIC) {
        "asia_pacific"
    } else {
        "worldwide"
    }
}

/// An explicit remote flag from the source wins; otherwise the location text decides.
pub fn is_remote(location: Option<&str>, remote_flag: Option<bool>) -> bool {
    if let Some(flag) = remote_flag {
        return flag;
    }
    location
        .map(|l| {
            let t = padded_terms(l);
            has_any(
                &t,
                &[
                    "remote",
                    "anywhere",
                    "worldwide",
                    "distributed",
                    "work from home",
                    "wfh",
                ],
            )
        })
        .unwrap_or(false)
}

// ────────────────────────────────────────────────────────────────────────────
// Salary
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Salary {
    pub min: i32,
    pub max: i32,
    pub currency: String,
}

fn detect_currency(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    if text.contains('€') || lower.contains("eur") {
        Some("EUR")
    } else if text.contains('£') || lower.contains("gbp") {
        Some("GBP")
    } else if lower.contains("cad") || lower.contains("ca$") {
        Some("CAD")
    } else if text.contains('$') || lower.contains("usd") {
        Some("USD")
    } else {
        None
    }
}

const HOURLY_MARKERS: &[&str] = &["hour", "/hr", "per hr", "hourly"];

/// "1.5" or "120.50": a single point followed by one or two digits. Three
/// digits after the point ("60.000") is a thousands separator.
fn is_decimal_amount(amount: &str) -> bool {
    match amount.split_once('.') {
        Some((_, fraction)) => !amount.contains(',') && (1..=2).contains(&fraction.len()),
        None => false,
    }
}

/// Parses a free-text salary ("$120,000 - $150,000", "$120k–$150k", "€60k",
/// "USD 90000", "$50-70k"). Requires a currency marker or a `k` suffix;
/// hourly rates and amounts below 1000 are ignored.
pub fn parse_salary(text: &str) -> Option<Salary> {
    let lower = text.to_lowercase();
    if HOURLY_MARKERS.iter().any(|m| lower.contains(m)) {
        return None;
    }

    let mut amounts: Vec<(f64, bool)> = Vec::new();
    for caps in SALARY_AMOUNT.captures_iter(text) {
        let value: f64 = if is_decimal_amount(&caps[1]) {
            caps[1].parse().ok()?
        } else {
            caps[1].replace([',', '.'], "").parse().ok()?
        };
        amounts.push((value, caps.get(2).is_some()));
    }

    let any_k = amounts.iter().any(|(_, k)| *k);
    let currency = detect_currency(text);
    if currency.is_none() && !any_k {
        return None;
    }

    let values: Vec<i32> = amounts
        .into_iter()
        .map(|(v, k)| if k || (any_k && v < 1000.0) { v * 1000.0 } else { v })
        .filter(|v| (1000.0..=2_000_000.0).contains(v))
        .map(|v| v.round() as i32)
        .take(2)
        .collect();

    let (min, max) = match values.as_slice() {
        [] => return None,
        [single] => (*single, *single),
        [a, b, ..] => ((*a).min(*b), (*a).max(*b)),
    };

    Some(Salary {
        min,
        max,
        currency: currency.unwrap_or("USD").to_string(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// URLs
// ────────────────────────────────────────────────────────────────────────────

const TRACKING_PARAMS: &[&str] = &[
    "ref",
    "source",
    "src",
    "referrer",
    "gh_src",
    "lever-source",
    "lever-origin",
    "fbclid",
    "gclid",
];

fn is_tracking_param(key: &str) -> bool {
    let key = key.to_lowercase();
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key.as_str())
}

/// Canonical form used as the `apply_url` unique key.
/// https scheme, lowercase host without `www.`, no fragment, no tracking params,
/// no trailing slash.
pub fn canonicalize_url(raw: &str) -> Option<String> {
    let mut parsed = Url::parse(raw.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    let host = parsed.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    parsed.set_host(Some(&host)).ok()?;
    parsed.set_scheme("https").ok()?;
    parsed.set_fragment(None);

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(kept);
    }

    let mut canonical = parsed.to_string();
    if canonical.ends_with('/') {
        canonical.pop();
    }
    Some(canonical)
}

/// Aggregators and job boards that sit between the candidate and the employer.
const MIDDLEMAN_HOSTS: &[&str] = &[
    "remoteok.com",
    "remoteok.io",
    "remotive.com",
    "remotive.io",
    "weworkremotely.com",
    "linkedin.com",
    "indeed.com",
    "glassdoor.com",
    "ziprecruiter.com",
    "himalayas.app",
    "jooble.org",
    "remote.co",
    "angel.co",
    "wellfound.com",
    "builtin.com",
    "dribbble.com",
    "workingnomads.com",
    "jobgether.com",
];

/// False for links that go through an aggregator; ATS hosts and company sites
/// count as direct.
pub fn is_direct_url(url: &str) -> bool {
    let Some(host) = Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
    else {
        return false;
    };
    !MIDDLEMAN_HOSTS
        .iter()
        .any(|m| host == *m || host.ends_with(&format!(".{m}")))
}

// ────────────────────────────────────────────────────────────────────────────
// Normalize
// ────────────────────────────────────────────────────────────────────────────

/// Turns a raw source job into a `NewJob`, or `None` when it does not belong on
/// the board (not a design role, not remote, or no usable URL).
pub fn normalize(raw: RawJob, source: &str) -> Option<NewJob> {
    let title = raw.title.split_whitespace().collect::<Vec<_>>().join(" ");
    let company = raw.company.trim().to_string();
    if title.is_empty() || company.is_empty() {
        return None;
    }
    if !is_design_role(&title) {
        return None;
    }
    let location = raw
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from);
    if !is_remote(location.as_deref(), raw.remote) {
        return None;
    }
    let apply_url = canonicalize_url(&raw.url)?;

    let salary = match (raw.salary_min, raw.salary_max) {
        (Some(min), max) => Some(Salary {
            min,
            max: max.unwrap_or(min).max(min),
            currency: raw.salary_currency.clone().unwrap_or_else(|| "USD".to_string()),
        }),
        _ => raw.salary_text.as_deref().and_then(parse_salary),
    };

    Some(NewJob {
        category: classify_category(&title).to_string(),
        job_type: classify_job_type(raw.employment_type.as_deref(), &title).to_string(),
        experience_level: classify_experience(&title).to_string(),
        region: classify_region(location.as_deref()).to_string(),
        is_direct: is_direct_url(&apply_url),
        title,
        company,
        company_logo: raw.company_logo.filter(|l| !l.trim().is_empty()),
        location,
        salary_min: salary.as_ref().map(|s| s.min),
        salary_max: salary.as_ref().map(|s| s.max),
        salary_currency: salary.map(|s| s.currency),
        description: strip_html(&raw.description),
        apply_url,
        source: source.to_string(),
        source_id: raw.source_id,
        posted_at: raw.posted_at.unwrap_or_else(Utc::now),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, location: Option<&str>, url: &str) -> RawJob {
        RawJob {
            title: title.to_string(),
            company: "Figma".to_string(),
            location: location.map(String::from),
            url: url.to_string(),
            description: "<p>Design things</p>".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_strip_html_paragraphs_and_entities() {
        let text = strip_html("<p>Hello&nbsp;world &amp; friends</p><p>Second</p>");
        assert_eq!(text, "Hello world & friends\nSecond");
    }

    #[test]
    fn test_strip_html_lists_get_bullets() {
        let text = strip_html("<ul><li>Figma</li><li>Sketch</li></ul>");
        assert_eq!(text, "• Figma\n• Sketch");
    }

    #[test]
    fn test_strip_html_unescapes_greenhouse_content() {
        let text = strip_html("&lt;p&gt;Join our &lt;strong&gt;design&lt;/strong&gt; team&lt;/p&gt;");
        assert_eq!(text, "Join our design team");
    }

    #[test]
    fn test_strip_html_drops_scripts() {
        let text = strip_html("<p>Role</p><script>alert(1)</script>");
        assert_eq!(text, "Role");
    }

    #[test]
    fn test_design_roles_accepted() {
        assert!(is_design_role("Senior Product Designer"));
        assert!(is_design_role("UX/UI Designer"));
        assert!(is_design_role("Staff UX Researcher"));
        assert!(is_design_role("Head of Design"));
        assert!(is_design_role("Design Engineer"));
        assert!(is_design_role("Creative Director"));
    }

    #[test]
    fn test_non_design_roles_rejected() {
        assert!(!is_design_role("Senior Backend Engineer"));
        assert!(!is_design_role("Software Engineer, Design Tools"));
        assert!(!is_design_role("ASIC Design Engineer"));
        assert!(!is_design_role("Interior Designer"));
        assert!(!is_design_role("Design Recruiter"));
        assert!(!is_design_role("Build Infrastructure Lead"));
        assert!(!is_design_role("Product Guide Writer"));
    }

    #[test]
    fn test_category_classification() {
        assert_eq!(classify_category("Senior Product Designer"), "product_design");
        assert_eq!(classify_category("UX/UI Designer"), "ux_ui");
        assert_eq!(classify_category("Brand Designer"), "graphic_brand");
        assert_eq!(classify_category("Art Director"), "graphic_brand");
        assert_eq!(classify_category("Motion Designer"), "motion");
        assert_eq!(classify_category("Senior UX Researcher"), "research");
        assert_eq!(classify_category("Head of Design"), "leadership");
        assert_eq!(classify_category("Design Director"), "leadership");
        assert_eq!(classify_category("Design Engineer"), "design_engineering");
        assert_eq!(classify_category("Content Designer"), "content_design");
    }

    #[test]
    fn test_job_type_from_hint_variants() {
        assert_eq!(classify_job_type(Some("FullTime"), "Designer"), "full_time");
        assert_eq!(classify_job_type(Some("Part-time"), "Designer"), "part_time");
        assert_eq!(classify_job_type(Some("Contract"), "Designer"), "contract");
        assert_eq!(classify_job_type(Some("Intern"), "Designer"), "internship");
        assert_eq!(classify_job_type(Some("freelance"), "Designer"), "freelance");
    }

    #[test]
    fn test_job_type_falls_back_to_title() {
        assert_eq!(classify_job_type(None, "Product Design Intern"), "internship");
        assert_eq!(classify_job_type(None, "Contract Brand Designer"), "contract");
        assert_eq!(classify_job_type(None, "Part-Time Illustrator"), "part_time");
        assert_eq!(classify_job_type(Some("Other"), "Product Designer"), "full_time");
    }

    #[test]
    fn test_experience_levels() {
        assert_eq!(classify_experience("Junior UI Designer"), "entry");
        assert_eq!(classify_experience("Product Designer"), "mid");
        assert_eq!(classify_experience("Sr. Product Designer"), "senior");
        assert_eq!(classify_experience("Senior Staff Designer"), "lead");
        assert_eq!(classify_experience("Principal Designer"), "lead");
    }

    #[test]
    fn test_region_classification() {
        assert_eq!(classify_region(Some("Remote - US")), "north_america");
        assert_eq!(classify_region(Some("Remote (Canada)")), "north_america");
        assert_eq!(classify_region(Some("Remote, EMEA")), "europe");
        assert_eq!(classify_region(Some("London or Remote UK")), "europe");
        assert_eq!(classify_region(Some("LATAM")), "latin_america");
        assert_eq!(classify_region(Some("Remote - APAC")), "asia_pacific");
        assert_eq!(classify_region(Some("Remote, South Africa")), "africa");
        assert_eq!(classify_region(Some("Anywhere in the World")), "worldwide");
        assert_eq!(classify_region(None), "worldwide");
    }

    #[test]
    fn test_region_does_not_match_inside_words() {
        // "us" only matches as a whole word
        assert_eq!(classify_region(Some("Remote, focus on async")), "worldwide");
    }

    #[test]
    fn test_remote_detection() {
        assert!(is_remote(Some("Remote - US"), None));
        assert!(is_remote(Some("Anywhere"), None));
        assert!(!is_remote(Some("New York, NY"), None));
        assert!(!is_remote(None, None));
        assert!(is_remote(Some("New York, NY"), Some(true)));
        assert!(!is_remote(Some("Remote"), Some(false)));
    }

    #[test]
    fn test_parse_salary_full_numbers() {
        let s = parse_salary("$120,000 - $150,000").unwrap();
        assert_eq!((s.min, s.max, s.currency.as_str()), (120_000, 150_000, "USD"));
    }

    #[test]
    fn test_parse_salary_k_range() {
        let s = parse_salary("$120k–$150k").unwrap();
        assert_eq!((s.min, s.max), (120_000, 150_000));
    }

    #[test]
    fn test_parse_salary_shorthand_range() {
        let s = parse_salary("$50-70k").unwrap();
        assert_eq!((s.min, s.max), (50_000, 70_000));
    }

    #[test]
    fn test_parse_salary_euro_single() {
        let s = parse_salary("€60k").unwrap();
        assert_eq!((s.min, s.max, s.currency.as_str()), (60_000, 60_000, "EUR"));
    }

    #[test]
    fn test_parse_salary_point_separators() {
        let s = parse_salary("€60.000 - €75.000").unwrap();
        assert_eq!((s.min, s.max), (60_000, 75_000));
        let s = parse_salary("$1.5k").unwrap();
        assert_eq!(s.min, 1_500);
    }

    #[test]
    fn test_parse_salary_code_prefix() {
        let s = parse_salary("USD 90000").unwrap();
        assert_eq!((s.min, s.currency.as_str()), (90_000, "USD"));
    }

    #[test]
    fn test_parse_salary_rejects_hourly_and_plain_numbers() {
        assert!(parse_salary("$50/hr").is_none());
        assert!(parse_salary("$120.50 per hour").is_none());
        assert!(parse_salary("$120.50").is_none());
        assert!(parse_salary("USD 45.75 hourly").is_none());
        assert!(parse_salary("Founded in 2015").is_none());
        assert!(parse_salary("Competitive").is_none());
    }

    #[test]
    fn test_canonicalize_strips_tracking_and_www() {
        let url = canonicalize_url(
            "http://WWW.Example.com/jobs/123/?utm_source=x&gh_src=abc&id=7#apply",
        )
        .unwrap();
        assert_eq!(url, "https://example.com/jobs/123/?id=7");
    }

    #[test]
    fn test_canonicalize_trailing_slash() {
        assert_eq!(
            canonicalize_url("https://jobs.lever.co/acme/abc-123/").unwrap(),
            "https://jobs.lever.co/acme/abc-123"
        );
    }

    #[test]
    fn test_canonicalize_rejects_non_http() {
        assert!(canonicalize_url("mailto:jobs@example.com").is_none());
        assert!(canonicalize_url("not a url").is_none());
    }

    #[test]
    fn test_direct_vs_middleman() {
        assert!(is_direct_url("https://boards.greenhouse.io/figma/jobs/1"));
        assert!(is_direct_url("https://jobs.lever.co/acme/abc"));
        assert!(is_direct_url("https://careers.example.com/design"));
        assert!(!is_direct_url("https://remoteok.com/remote-jobs/123"));
        assert!(!is_direct_url("https://www.linkedin.com/jobs/view/1"));
        assert!(!is_direct_url("https://remotive.com/remote-jobs/design/x"));
    }

    #[test]
    fn test_normalize_accepts_remote_design_job() {
        let job = normalize(
            raw("Senior Product Designer", Some("Remote - US"), "https://boards.greenhouse.io/figma/jobs/1?gh_src=x"),
            "greenhouse:figma",
        )
        .unwrap();
        assert_eq!(job.apply_url, "https://boards.greenhouse.io/figma/jobs/1");
        assert_eq!(job.region, "north_america");
        assert_eq!(job.experience_level, "senior");
        assert_eq!(job.category, "product_design");
        assert_eq!(job.description, "Design things");
        assert!(job.is_direct);
        assert_eq!(job.source, "greenhouse:figma");
    }

    #[test]
    fn test_normalize_rejects_onsite_and_non_design() {
        assert!(normalize(raw("Product Designer", Some("Berlin"), "https://x.com/1"), "s").is_none());
        assert!(normalize(raw("Backend Engineer", Some("Remote"), "https://x.com/1"), "s").is_none());
        assert!(normalize(raw("Product Designer", Some("Remote"), "ftp://x.com/1"), "s").is_none());
    }

    #[test]
    fn test_normalize_prefers_numeric_salary() {
        let mut r = raw("Product Designer", Some("Remote"), "https://x.com/1");
        r.salary_min = Some(100_000);
        r.salary_max = Some(90_000);
        r.salary_text = Some("$1k".to_string());
        let job = normalize(r, "s").unwrap();
        assert_eq!(job.salary_min, Some(100_000));
        assert_eq!(job.salary_max, Some(100_000));
        assert_eq!(job.salary_currency.as_deref(), Some("USD"));
    }
}

//! Topic rotation and the text utilities the blog pipeline needs.

/// Evergreen topics for the remote design job market, used in order.
pub const TOPICS: &[&str] = &[
    "How to write a product design case study that gets you hired remotely",
    "Remote design salaries: what the current listings actually pay",
    "Which regions are hiring the most remote designers right now",
    "Building a UX research portfolio when your work is under NDA",
    "Async design critique: rituals that work across time zones",
    "From graphic design to product design: a remote career transition guide",
    "What design leadership roles look like at remote-first companies",
    "Motion design jobs: skills and tools companies ask for",
    "Contract vs full-time: choosing the right remote design arrangement",
    "Design engineering: the hybrid role remote teams keep hiring for",
    "How to stand out when applying directly on company career pages",
    "Content design and UX writing: the remote opportunities in 2024",
    "Preparing for a remote design whiteboard challenge",
    "Entry-level remote design jobs: where they are and how to land one",
    "Design systems roles: what hiring managers look for",
];

/// The first topic not in `used` (compared case-insensitively).
pub fn next_topic(used: &[String]) -> Option<&'static str> {
    TOPICS
        .iter()
        .find(|t| !used.iter().any(|u| u.eq_ignore_ascii_case(t)))
        .copied()
}

/// Lowercase ASCII slug, words joined by `-`, capped at 80 characters.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.len() > 80 {
        slug.truncate(80);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    if slug.is_empty() {
        slug.push_str("post");
    }
    slug
}

/// `base`, or `base-2`, `base-3`… whichever is not taken.
pub fn unique_slug(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|t| t == base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.iter().any(|t| t == candidate))
        .unwrap_or_else(|| base.to_string())
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Minutes at 200 words per minute, at least one.
pub fn reading_minutes(words: usize) -> i32 {
    words.div_ceil(200).max(1) as i32
}

/// Cuts `text` to at most `max` characters on a char boundary, adding an
/// ellipsis when something was removed.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out = out.trim_end().to_string();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_topic_skips_used() {
        let used = vec![TOPICS[0].to_uppercase()];
        assert_eq!(next_topic(&used), Some(TOPICS[1]));
    }

    #[test]
    fn test_next_topic_exhausted() {
        let used: Vec<String> = TOPICS.iter().map(|t| t.to_string()).collect();
        assert_eq!(next_topic(&used), None);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(
            slugify("Remote Design Salaries: What's Paying in 2024?"),
            "remote-design-salaries-what-s-paying-in-2024"
        );
        assert_eq!(slugify("  --UX/UI--  "), "ux-ui");
        assert_eq!(slugify("!!!"), "post");
    }

    #[test]
    fn test_slugify_caps_length() {
        let slug = slugify(&"design ".repeat(30));
        assert!(slug.len() <= 80);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_unique_slug_suffixes() {
        let taken = vec!["hiring".to_string(), "hiring-2".to_string()];
        assert_eq!(unique_slug("hiring", &taken), "hiring-3");
        assert_eq!(unique_slug("fresh", &taken), "fresh");
    }

    #[test]
    fn test_reading_minutes_rounds_up() {
        assert_eq!(reading_minutes(0), 1);
        assert_eq!(reading_minutes(200), 1);
        assert_eq!(reading_minutes(201), 2);
        assert_eq!(reading_minutes(1000), 5);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 300), "short");
        let long = "é".repeat(400);
        let cut = truncate_chars(&long, 300);
        assert_eq!(cut.chars().count(), 300);
        assert!(cut.ends_with('…'));
    }
}

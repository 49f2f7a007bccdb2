//! sitemap.xml generation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::seo::landing::LandingPage;

/// Root path of the landing pages on the site.
pub const LANDING_ROOT: &str = "/remote-design-jobs";

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapUrl {
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

pub(crate) fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Every public URL: static pages, landing pages, job details, blog posts.
pub fn collect_urls(
    site_url: &str,
    landing_pages: &[LandingPage],
    jobs: &[(Uuid, DateTime<Utc>)],
    posts: &[(String, DateTime<Utc>)],
) -> Vec<SitemapUrl> {
    let mut urls = vec![
        SitemapUrl {
            loc: format!("{site_url}/"),
            lastmod: None,
            changefreq: "hourly",
            priority: "1.0",
        },
        SitemapUrl {
            loc: format!("{site_url}/jobs"),
            lastmod: None,
            changefreq: "hourly",
            priority: "0.9",
        },
        SitemapUrl {
            loc: format!("{site_url}/blog"),
            lastmod: posts.iter().map(|(_, t)| *t).max(),
            changefreq: "daily",
            priority: "0.7",
        },
    ];

    urls.extend(landing_pages.iter().map(|page| SitemapUrl {
        loc: format!("{site_url}{LANDING_ROOT}/{}", page.slug),
        lastmod: None,
        changefreq: "daily",
        priority: "0.8",
    }));
    urls.extend(jobs.iter().map(|(id, updated)| SitemapUrl {
        loc: format!("{site_url}/jobs/{id}"),
        lastmod: Some(*updated),
        changefreq: "weekly",
        priority: "0.6",
    }));
    urls.extend(posts.iter().map(|(slug, published)| SitemapUrl {
        loc: format!("{site_url}/blog/{slug}"),
        lastmod: Some(*published),
        changefreq: "monthly",
        priority: "0.5",
    }));

    urls
}

pub fn render_sitemap(urls: &[SitemapUrl]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for url in urls {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&url.loc)));
        if let Some(lastmod) = url.lastmod {
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                lastmod.format("%Y-%m-%d")
            ));
        }
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", url.changefreq));
        xml.push_str(&format!("    <priority>{}</priority>\n", url.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Loads the dynamic parts of the sitemap and renders it.
pub async fn build_sitemap(
    pool: &PgPool,
    site_url: &str,
    landing_pages: &[LandingPage],
) -> Result<String, sqlx::Error> {
    let jobs: Vec<(Uuid, DateTime<Utc>)> =
        sqlx::query_as("SELECT id, updated_at FROM jobs ORDER BY posted_at DESC")
            .fetch_all(pool)
            .await?;
    let posts: Vec<(String, DateTime<Utc>)> =
        sqlx::query_as("SELECT slug, published_at FROM blog_posts ORDER BY published_at DESC")
            .fetch_all(pool)
            .await?;

    Ok(render_sitemap(&collect_urls(site_url, landing_pages, &jobs, &posts)))
}

//! Best-effort Redis cache for rendered landing pages and the sitemap.
//! A Redis outage degrades to uncached responses, never to errors.

use redis::AsyncCommands;
use tracing::warn;

/// One hour.
pub const PAGE_TTL_SECS: u64 = 3600;

pub async fn cache_get(redis: &redis::Client, key: &str) -> Option<String> {
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            warn!("Redis unavailable, skipping cache read for {key}: {e}");
            return None;
        }
    };
    match conn.get::<_, Option<String>>(key).await {
        Ok(value) => value,
        Err(e) => {
            warn!("Redis GET {key} failed: {e}");
            None
        }
    }
}

pub async fn cache_set(redis: &redis::Client, key: &str, value: &str, ttl_secs: u64) {
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            warn!("Redis unavailable, skipping cache write for {key}: {e}");
            return;
        }
    };
    let result: redis::RedisResult<()> = redis::cmd("SET")
        .arg(key)
        .arg(value)
        .arg("EX")
        .arg(ttl_secs)
        .query_async(&mut conn)
        .await;
    if let Err(e) = result {
        warn!("Redis SET {key} failed: {e}");
    }
}

/// Drops every cached landing page and the sitemap after the jobs table changes.
/// Uses SCAN so a large keyspace never blocks Redis.
pub async fn invalidate_pages(redis: &redis::Client) {
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            warn!("Redis unavailable, skipping cache invalidation: {e}");
            return;
        }
    };

    let mut keys: Vec<String> = Vec::new();
    {
        let mut iter = match conn.scan_match::<_, String>(LANDING_PATTERN).await {
            Ok(iter) => iter,
            Err(e) => {
                warn!("Redis SCAN failed: {e}");
                return;
            }
        };
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
    }

    keys.push(SITEMAP_KEY.to_string());
    for batch in keys.chunks(DEL_BATCH) {
        if let Err(e) = conn.del::<_, ()>(batch).await {
            warn!("Redis DEL failed: {e}");
            return;
        }
    }
}

pub const SITEMAP_KEY: &str = "sitemap:xml";
const LANDING_PATTERN: &str = "landing:*";
const DEL_BATCH: usize = 500;
/// Landing pages past this one are served uncached.
pub const MAX_CACHED_PAGE: i64 = 20;

/// Cache key for a landing page, or None when the page is too deep to cache.
pub fn landing_key(slug: &str, page: i64) -> Option<String> {
    (1..=MAX_CACHED_PAGE)
        .contains(&page)
        .then(|| format!("landing:{slug}:{page}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_key_format() {
        assert_eq!(
            landing_key("region/europe", 2).as_deref(),
            Some("landing:region/europe:2")
        );
    }

    #[test]
    fn test_deep_pages_are_not_cached() {
        assert!(landing_key("region/europe", MAX_CACHED_PAGE).is_some());
        assert!(landing_key("region/europe", MAX_CACHED_PAGE + 1).is_none());
        assert!(landing_key("region/europe", 0).is_none());
    }
}

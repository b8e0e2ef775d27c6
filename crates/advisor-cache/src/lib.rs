use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use advisor_core::CacheStore;

/// Internal cache entry stamped with its expiry deadline.
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// In-process TTL cache backed by a concurrent map. Expired entries are
/// dropped lazily on read and whenever a pattern delete walks the map.
#[derive(Default)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Anchored glob match supporting `*` as "any run of characters".
fn glob_match(pattern: &str, key: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == key;
    }

    let mut rest = key;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }

    // Pattern ended with '*', anything trailing matches.
    true
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => {
                if Instant::now() < entry.expires_at {
                    return Some(entry.value.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    async fn delete_pattern(&self, pattern: &str) {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries
            .retain(|key, entry| now < entry.expires_at && !glob_match(pattern, key));
        tracing::debug!(
            "cache pattern delete '{}' removed {} entries",
            pattern,
            before - self.entries.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips_until_ttl() {
        let cache = MemoryCache::new();
        cache
            .set("quote:AAPL:NYSE", "{\"p\":1}".to_string(), Duration::from_secs(30))
            .await;
        assert_eq!(
            cache.get("quote:AAPL:NYSE").await.as_deref(),
            Some("{\"p\":1}")
        );
    }

    #[tokio::test]
    async fn expired_entry_reads_as_absent() {
        let cache = MemoryCache::new();
        cache
            .set("quote:AAPL:NYSE", "x".to_string(), Duration::from_millis(10))
            .await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(cache.get("quote:AAPL:NYSE").await, None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn missing_key_is_absent() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("nope").await, None);
    }

    #[tokio::test]
    async fn pattern_delete_only_touches_matching_keys() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache
            .set("recommendation:AAPL:NYSE:conservative", "a".into(), ttl)
            .await;
        cache
            .set("recommendation:MSFT:NASDAQ:conservative", "b".into(), ttl)
            .await;
        cache
            .set("recommendation:AAPL:NYSE:aggressive", "c".into(), ttl)
            .await;
        cache.set("quote:AAPL:NYSE", "d".into(), ttl).await;

        cache.delete_pattern("recommendation:*:conservative").await;

        assert_eq!(cache.get("recommendation:AAPL:NYSE:conservative").await, None);
        assert_eq!(
            cache.get("recommendation:MSFT:NASDAQ:conservative").await,
            None
        );
        assert!(cache
            .get("recommendation:AAPL:NYSE:aggressive")
            .await
            .is_some());
        assert!(cache.get("quote:AAPL:NYSE").await.is_some());
    }

    #[test]
    fn glob_match_handles_literal_and_wildcard_patterns() {
        assert!(glob_match("quote:AAPL:NYSE", "quote:AAPL:NYSE"));
        assert!(!glob_match("quote:AAPL:NYSE", "quote:AAPL:NASDAQ"));
        assert!(glob_match("quote:*", "quote:AAPL:NYSE"));
        assert!(glob_match("recommendation:*:moderate", "recommendation:V:NYSE:moderate"));
        assert!(!glob_match("recommendation:*:moderate", "recommendation:V:NYSE:aggressive"));
        assert!(glob_match("*", "anything"));
    }
}

//! Time-boxed in-memory cache for upstream API responses.
//!
//! Uses `DashMap` for lock-free concurrent access. Entries are never
//! explicitly evicted: a stale entry simply stops being served and is
//! overwritten by the next successful fetch for the same key.

use dashmap::DashMap;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// A cached API response with staleness tracking.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fetched_at: Instant,
    pub data: Value,
}

impl CacheEntry {
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Shared response cache keyed by request signature (URL).
///
/// One instance is created at startup and handed to each provider client,
/// so cache lifetime is tied to the application rather than a module global.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    entries: Arc<DashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached payload for `key` if it is younger than `ttl`.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if entry.is_fresh(ttl) {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    /// Store a payload under `key`, replacing any previous entry.
    pub fn put(&self, key: impl Into<String>, data: Value) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                fetched_at: Instant::now(),
                data,
            },
        );
    }

    /// Cache-first wrapper around an async fetch.
    ///
    /// Serves a fresh entry when one exists; otherwise runs `fetch`, stores
    /// the payload on success, and returns it. A failed fetch leaves the
    /// cache untouched.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> crate::Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = crate::Result<Value>>,
    {
        if let Some(hit) = self.get(key, ttl) {
            debug!("cache hit: {}", key);
            return Ok(hit);
        }

        debug!("cache miss: {}", key);
        let data = fetch().await?;
        self.put(key, data.clone());
        Ok(data)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn test_second_call_within_ttl_hits_cache() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_fetch("http://example/flow", TTL, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"flow": 0.9}))
                })
                .await
                .expect("fetch should succeed");
            assert_eq!(value["flow"], 0.9);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            // Zero TTL: every entry is stale by the time it is read back.
            cache
                .get_or_fetch("http://example/flow", Duration::ZERO, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"flow": 1.0}))
                })
                .await
                .expect("fetch should succeed");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_does_not_populate_cache() {
        let cache = ResponseCache::new();

        let result = cache
            .get_or_fetch("http://example/weather", TTL, || async {
                Err(crate::Error::Http("503".into()))
            })
            .await;

        assert!(result.is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.get("http://example/weather", TTL), None);
    }

    #[test]
    fn test_stale_entry_left_in_place_until_overwritten() {
        let cache = ResponseCache::new();
        cache.put("k", json!(1));

        assert_eq!(cache.get("k", Duration::ZERO), None);
        assert_eq!(cache.len(), 1);

        cache.put("k", json!(2));
        assert_eq!(cache.get("k", TTL), Some(json!(2)));
        assert_eq!(cache.len(), 1);
    }
}

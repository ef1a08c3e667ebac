//! In-process fallback cache with the same TTL semantics as the Redis
//! backend.
//!
//! Unlike Redis, an expired entry is not dropped: it stays available through
//! [`MemoryCache::get_stale`] so a failed refresh can still serve the last
//! good value. The store holds exactly one report entry plus the
//! `last_fetch` marker.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

struct StoredEntry {
    json: String,
    inserted: Instant,
}

/// Single-entry in-memory report cache.
pub struct MemoryCache {
    ttl: Duration,
    entry: Mutex<Option<StoredEntry>>,
    last_fetch: Mutex<Option<DateTime<Utc>>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
            last_fetch: Mutex::new(None),
        }
    }

    /// Returns the cached JSON if present and not past its TTL.
    pub async fn get(&self) -> Option<String> {
        let guard = self.entry.lock().await;
        guard
            .as_ref()
            .filter(|e| e.inserted.elapsed() < self.ttl)
            .map(|e| e.json.clone())
    }

    /// Returns the cached JSON regardless of TTL.
    ///
    /// Used when a refresh has failed and serving stale data beats serving
    /// an error.
    pub async fn get_stale(&self) -> Option<String> {
        let guard = self.entry.lock().await;
        guard.as_ref().map(|e| e.json.clone())
    }

    /// Stores the serialized report, replacing any previous entry.
    pub async fn put(&self, json: String) {
        let mut guard = self.entry.lock().await;
        *guard = Some(StoredEntry {
            json,
            inserted: Instant::now(),
        });
    }

    pub async fn last_fetch(&self) -> Option<DateTime<Utc>> {
        *self.last_fetch.lock().await
    }

    pub async fn set_last_fetch(&self, at: DateTime<Utc>) {
        let mut guard = self.last_fetch.lock().await;
        *guard = Some(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_cache_misses() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        assert!(cache.get().await.is_none());
        assert!(cache.get_stale().await.is_none());
        assert!(cache.last_fetch().await.is_none());
    }

    #[tokio::test]
    async fn stored_value_round_trips_verbatim() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        let json = r#"{"trends":[],"generated_at":"2026-08-01T00:00:00Z"}"#.to_string();
        cache.put(json.clone()).await;
        assert_eq!(cache.get().await.as_deref(), Some(json.as_str()));
    }

    #[tokio::test]
    async fn expired_entry_misses_but_stays_available_stale() {
        let cache = MemoryCache::new(Duration::ZERO);
        cache.put("{}".to_string()).await;
        assert!(cache.get().await.is_none(), "zero TTL expires immediately");
        assert_eq!(cache.get_stale().await.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn put_replaces_previous_entry() {
        let cache = MemoryCache::new(Duration::from_secs(60));
        cache.put("first".to_string()).await;
        cache.put("second".to_string()).await;
        assert_eq!(cache.get().await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn last_fetch_marker_is_independent_of_entry_ttl() {
        let cache = MemoryCache::new(Duration::ZERO);
        let at = "2026-08-01T12:00:00Z".parse().expect("timestamp");
        cache.set_last_fetch(at).await;
        assert_eq!(cache.last_fetch().await, Some(at));
        assert!(cache.get().await.is_none());
    }
}

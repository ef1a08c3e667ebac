//! Tiered report cache: Redis first, in-process memory as mirror and
//! fallback.
//!
//! The aggregator is the sole writer; every write goes to the memory mirror
//! unconditionally and to Redis best-effort, so a backend outage degrades
//! reads transparently instead of failing requests. Deserialization
//! failures are treated as cache misses, never surfaced.

use std::time::Duration;

use chrono::{DateTime, Utc};

use signal_core::report::IntelligenceReport;

use crate::memory::MemoryCache;
use crate::redis_store::RedisStore;

/// Redis key holding the serialized report.
const REPORT_KEY: &str = "sonar:market_intelligence";
/// Redis key holding the last successful fetch time as epoch seconds.
/// Deliberately has no TTL: the freshness controller reads it regardless of
/// report expiry.
const LAST_FETCH_KEY: &str = "sonar:market_intelligence:last_fetch";

/// The single report cache shared by all requests.
pub struct ReportCache {
    redis: Option<RedisStore>,
    memory: MemoryCache,
    ttl_secs: u64,
}

impl ReportCache {
    /// Builds a cache over an optional Redis backend. Pass `None` to run
    /// memory-only (backend unreachable at startup, or tests).
    #[must_use]
    pub fn new(redis: Option<RedisStore>, ttl: Duration) -> Self {
        Self {
            redis,
            memory: MemoryCache::new(ttl),
            ttl_secs: ttl.as_secs(),
        }
    }

    /// Memory-only cache with the given TTL.
    #[must_use]
    pub fn memory_only(ttl: Duration) -> Self {
        Self::new(None, ttl)
    }

    /// Returns the cached report if a fresh (unexpired) entry exists.
    ///
    /// Redis failures and misses fall through to the memory mirror.
    pub async fn get_report(&self) -> Option<IntelligenceReport> {
        if let Some(redis) = &self.redis {
            match redis.get(REPORT_KEY).await {
                Ok(Some(json)) => {
                    if let Some(report) = parse_report(&json) {
                        return Some(report);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "cache backend read failed, falling back to memory");
                }
            }
        }
        let json = self.memory.get().await?;
        parse_report(&json)
    }

    /// Returns any cached report, expired or not.
    ///
    /// Used to prefer stale data over an error after a failed refresh.
    pub async fn get_report_any(&self) -> Option<IntelligenceReport> {
        if let Some(report) = self.get_report().await {
            return Some(report);
        }
        let json = self.memory.get_stale().await?;
        parse_report(&json)
    }

    /// Stores a freshly aggregated report with the configured TTL.
    ///
    /// The memory mirror always receives the value; the Redis write is
    /// best-effort and logged on failure.
    pub async fn put_report(&self, report: &IntelligenceReport) {
        let json = match serde_json::to_string(report) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "report failed to serialize, skipping cache write");
                return;
            }
        };

        if let Some(redis) = &self.redis {
            if let Err(e) = redis.set_ex(REPORT_KEY, &json, self.ttl_secs).await {
                tracing::warn!(error = %e, "cache backend write failed, memory mirror only");
            }
        }
        self.memory.put(json).await;
    }

    /// Reads the last successful fetch time.
    pub async fn last_fetch(&self) -> Option<DateTime<Utc>> {
        if let Some(redis) = &self.redis {
            match redis.get(LAST_FETCH_KEY).await {
                Ok(Some(raw)) => {
                    if let Some(at) = parse_epoch(&raw) {
                        return Some(at);
                    }
                    tracing::warn!(raw, "unparseable last_fetch marker, treating as absent");
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "cache backend marker read failed, falling back to memory");
                }
            }
        }
        self.memory.last_fetch().await
    }

    /// Records a successful fetch time (no TTL).
    pub async fn set_last_fetch(&self, at: DateTime<Utc>) {
        if let Some(redis) = &self.redis {
            if let Err(e) = redis.set(LAST_FETCH_KEY, &at.timestamp().to_string()).await {
                tracing::warn!(error = %e, "cache backend marker write failed, memory mirror only");
            }
        }
        self.memory.set_last_fetch(at).await;
    }

    /// Whether the Redis backend is currently reachable. Memory-only caches
    /// report `false`.
    pub async fn backend_connected(&self) -> bool {
        match &self.redis {
            Some(redis) => redis.is_connected(LAST_FETCH_KEY).await,
            None => false,
        }
    }
}

fn parse_report(json: &str) -> Option<IntelligenceReport> {
    match serde_json::from_str(json) {
        Ok(report) => Some(report),
        Err(e) => {
            tracing::warn!(error = %e, "cached report failed to deserialize, treating as miss");
            None
        }
    }
}

fn parse_epoch(raw: &str) -> Option<DateTime<Utc>> {
    let secs = raw.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0)
}

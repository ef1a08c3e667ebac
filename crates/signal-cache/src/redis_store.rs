//! Redis backend for the report cache.
//!
//! Uses a [`ConnectionManager`] so transient connection drops reconnect
//! automatically. Every command failure maps to
//! [`CacheError::Unavailable`]; the caller (the tiered store) decides how to
//! degrade.

use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::CacheError;

/// Shared Redis client for the report cache.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("manager", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisStore {
    /// Connects to Redis at `url` and establishes the managed connection.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unavailable`] if the URL is invalid or the
    /// initial connection cannot be established.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        Ok(Self { manager })
    }

    /// Reads a string value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unavailable`] on any backend failure.
    pub async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        Ok(conn.get::<_, Option<String>>(key).await?)
    }

    /// Writes a string value with a TTL in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unavailable`] on any backend failure.
    pub async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs).await?;
        Ok(())
    }

    /// Writes a string value without expiry (used for the `last_fetch`
    /// marker).
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Unavailable`] on any backend failure.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        conn.set::<_, _, ()>(key, value).await?;
        Ok(())
    }

    /// Connectivity probe for health reporting: any successful round-trip
    /// counts as connected.
    pub async fn is_connected(&self, probe_key: &str) -> bool {
        self.get(probe_key).await.is_ok()
    }
}

use thiserror::Error;

/// Errors raised by the cache layer.
///
/// These never reach HTTP callers: the store degrades to the in-process
/// memory cache on any backend failure.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The Redis backend could not be reached or the command failed.
    #[error("cache backend unavailable: {0}")]
    Unavailable(#[from] redis::RedisError),
}

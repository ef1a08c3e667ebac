//! Report cache for the neural-signal service.
//!
//! One logical report key lives in Redis with a TTL; an in-process
//! [`MemoryCache`] mirrors every write so the service keeps serving when the
//! backend is unreachable. A separate TTL-less `last_fetch` marker feeds the
//! freshness controller, which decides whether a refresh attempt is
//! warranted independently of cache expiry.

pub mod error;
pub mod freshness;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use error::CacheError;
pub use memory::MemoryCache;
pub use redis_store::RedisStore;
pub use store::ReportCache;

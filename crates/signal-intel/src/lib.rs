//! Aggregation pipeline for the neural-signal service.
//!
//! Fans the four category fetches out concurrently, merges them
//! all-or-nothing into one [`signal_core::report::IntelligenceReport`],
//! persists the result through the tiered cache, and guards refreshes with
//! a freshness gate and a single-flight mutex so concurrent requests never
//! trigger duplicate upstream rounds.

pub mod error;
pub mod fallback;
pub mod pipeline;

pub use error::{CategoryFailure, IntelError};
pub use pipeline::IntelService;

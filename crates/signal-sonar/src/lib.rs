//! Upstream client for the Perplexity Sonar Pro API.
//!
//! Builds one chat-completions interaction per intelligence category, sends
//! it with bounded timeouts and an explicit retry policy, normalizes the
//! returned text payload, validates it against the fixed per-section schema,
//! and parses it into the typed report model.

pub mod cleanup;
pub mod client;
pub mod error;
pub mod prompts;
pub mod retry;
pub mod schema;
pub mod types;

pub use client::SonarClient;
pub use error::SonarError;
pub use retry::RetryPolicy;
pub use schema::Section;
pub use types::{Category, CategoryData, TrendsPayload};

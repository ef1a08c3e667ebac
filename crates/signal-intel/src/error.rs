use thiserror::Error;

use signal_sonar::Category;

/// One failed category inside an aggregation attempt.
#[derive(Debug, Clone)]
pub struct CategoryFailure {
    pub category: Category,
    pub message: String,
}

/// Errors surfaced by the aggregation pipeline.
#[derive(Debug, Error)]
pub enum IntelError {
    /// At least one category fetch failed; the report is all-or-nothing, so
    /// every per-category failure is listed and nothing was cached.
    #[error("aggregation failed: {}", summarize(.failures))]
    Aggregation { failures: Vec<CategoryFailure> },

    /// The minimum fetch interval has not elapsed and no cached report
    /// exists to serve instead.
    #[error("refresh not permitted yet; retry in {wait_seconds}s")]
    RateLimited { wait_seconds: u64 },
}

fn summarize(failures: &[CategoryFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.category, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

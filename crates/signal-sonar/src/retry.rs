//! Retry with exponential back-off and jitter for upstream calls.
//!
//! The schedule lives in an explicit [`RetryPolicy`] value consumed by
//! [`retry_with_policy`], which takes the sleep function as a parameter so
//! tests can record delays instead of actually waiting. Transient errors
//! (transport failures, any non-2xx status) are retried; payload and schema
//! errors are returned immediately since retrying cannot fix them.

use std::future::Future;
use std::time::Duration;

use crate::error::SonarError;

/// Exponential back-off schedule for upstream retries.
///
/// With the defaults, attempt `n` (1-based) sleeps
/// `base_delay × multiplier^(n−1)` before the next try, capped at
/// `max_delay`, with ±25% jitter applied at the sleep site:
///
/// | Attempt | Sleep before next attempt |
/// |---------|---------------------------|
/// | 1       | 1 s × 2⁰ ± 25%            |
/// | 2       | 1 s × 2¹ ± 25%            |
/// | 3       | 1 s × 2² ± 25%            |
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub multiplier: u32,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
            multiplier: 2,
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Builds a policy from configuration knobs, keeping the default
    /// multiplier and cap.
    #[must_use]
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(base_delay_ms),
            ..Self::default()
        }
    }

    /// Deterministic delay before the attempt after `attempt` (1-based)
    /// failures, before jitter.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(10);
        let factor = u64::from(self.multiplier).saturating_pow(exponent);
        let delay = self
            .base_delay
            .saturating_mul(u32::try_from(factor.min(u64::from(u32::MAX))).unwrap_or(u32::MAX));
        delay.min(self.max_delay)
    }
}

/// Returns `true` for errors worth retrying after a back-off delay.
///
/// **Retriable:** transport failures and any non-2xx response.
///
/// **Not retriable:** malformed payloads and schema violations (retrying
/// returns the same broken text), plus configuration errors.
pub(crate) fn is_retriable(err: &SonarError) -> bool {
    matches!(err, SonarError::Http(_) | SonarError::Status { .. })
}

/// Runs `operation` with up to `policy.max_retries` additional attempts on
/// transient errors, sleeping through `sleep` between attempts.
///
/// Exhausting the attempt budget surfaces
/// [`SonarError::UpstreamUnavailable`] carrying the attempt count and the
/// last error text. Non-retriable errors are returned unchanged.
pub async fn retry_with_policy<T, F, Fut, S, SFut>(
    policy: RetryPolicy,
    mut sleep: S,
    mut operation: F,
) -> Result<T, SonarError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SonarError>>,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) {
                    return Err(err);
                }
                attempt += 1;
                if attempt > policy.max_retries {
                    return Err(SonarError::UpstreamUnavailable {
                        attempts: attempt,
                        last_error: err.to_string(),
                    });
                }
                let delay = jitter(policy.delay_for(attempt));
                tracing::warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "upstream transient error, retrying after back-off"
                );
                sleep(delay).await;
            }
        }
    }
}

/// Applies ±25% jitter so retry bursts from concurrent processes spread out.
fn jitter(delay: Duration) -> Duration {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (delay.as_millis() as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    Duration::from_millis(jittered)
}

//! Freshness controller: decides whether a refresh attempt is warranted.
//!
//! Independent of the cache TTL — a cached value may still be unexpired
//! while the minimum fetch interval has already elapsed. Callers prefer an
//! unexpired cached value and consult this gate only when none exists or a
//! refresh is forced.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Returns `true` when a new upstream fetch is allowed.
///
/// Unconditionally `true` when no prior fetch is recorded; otherwise `true`
/// once `min_interval` has elapsed since `last_fetch`.
#[must_use]
pub fn should_fetch(
    last_fetch: Option<DateTime<Utc>>,
    min_interval: Duration,
    now: DateTime<Utc>,
) -> bool {
    let Some(last) = last_fetch else {
        return true;
    };
    // A marker in the future (clock skew) counts as zero elapsed time.
    let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO);
    elapsed >= min_interval
}

/// Seconds until the gate opens again; `0` when a fetch is already allowed.
///
/// Rounded up so callers can hand the value straight to a retry-after hint
/// (a gated caller always sees at least 1).
#[must_use]
pub fn wait_remaining(
    last_fetch: Option<DateTime<Utc>>,
    min_interval: Duration,
    now: DateTime<Utc>,
) -> u64 {
    let Some(last) = last_fetch else {
        return 0;
    };
    let elapsed = (now - last).to_std().unwrap_or(Duration::ZERO);
    let Some(remaining) = min_interval.checked_sub(elapsed) else {
        return 0;
    };
    if remaining.is_zero() {
        return 0;
    }
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: Duration = Duration::from_secs(300);

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().expect("timestamp")
    }

    #[test]
    fn no_prior_fetch_always_allows() {
        assert!(should_fetch(None, MIN, at("2026-08-01T00:00:00Z")));
        assert_eq!(wait_remaining(None, MIN, at("2026-08-01T00:00:00Z")), 0);
    }

    #[test]
    fn inside_interval_denies_idempotently() {
        let last = at("2026-08-01T00:00:00Z");
        for offset in ["00:00:01", "00:02:30", "00:04:59"] {
            let now = at(&format!("2026-08-01T{offset}Z"));
            assert!(
                !should_fetch(Some(last), MIN, now),
                "should deny at +{offset}"
            );
        }
    }

    #[test]
    fn exactly_at_interval_allows() {
        let last = at("2026-08-01T00:00:00Z");
        assert!(should_fetch(Some(last), MIN, at("2026-08-01T00:05:00Z")));
    }

    #[test]
    fn after_interval_allows() {
        let last = at("2026-08-01T00:00:00Z");
        assert!(should_fetch(Some(last), MIN, at("2026-08-01T01:00:00Z")));
    }

    #[test]
    fn marker_in_future_denies() {
        let last = at("2026-08-01T01:00:00Z");
        assert!(!should_fetch(Some(last), MIN, at("2026-08-01T00:59:00Z")));
    }

    #[test]
    fn wait_remaining_counts_down_and_rounds_up() {
        let last = at("2026-08-01T00:00:00Z");
        assert_eq!(wait_remaining(Some(last), MIN, at("2026-08-01T00:01:00Z")), 240);
        assert_eq!(wait_remaining(Some(last), MIN, at("2026-08-01T00:04:59Z")), 1);
        assert_eq!(wait_remaining(Some(last), MIN, at("2026-08-01T00:05:00Z")), 0);
        assert_eq!(wait_remaining(Some(last), MIN, at("2026-08-01T00:10:00Z")), 0);
    }
}

//! Pipeline orchestration: cache check, freshness gate, single-flight
//! refresh, parallel category fan-out, all-or-nothing merge.
//!
//! Per-request state machine:
//! `IDLE → CHECK_CACHE → {SERVE_CACHED | CHECK_FRESHNESS → {SERVE_CACHED |
//! FETCH → {VALIDATE → CACHE → SERVE_FRESH | FAIL}}}`.
//! Validation happens inside each category fetch, so the aggregator only
//! ever merges already-validated data.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;

use signal_cache::{freshness, ReportCache};
use signal_core::report::IntelligenceReport;
use signal_sonar::{Category, CategoryData, SonarClient};

use crate::error::{CategoryFailure, IntelError};
use crate::fallback;

/// The aggregation service shared by all HTTP requests.
///
/// Sole writer of the report cache. `client` is `None` in static-fallback
/// mode (no API key configured).
pub struct IntelService {
    client: Option<SonarClient>,
    cache: ReportCache,
    min_fetch_interval: Duration,
    /// Single-flight gate: at most one refresh runs per process; concurrent
    /// requests wait and are served the refreshed entry instead of issuing
    /// duplicate upstream rounds.
    refresh_gate: Mutex<()>,
}

impl IntelService {
    #[must_use]
    pub fn new(
        client: Option<SonarClient>,
        cache: ReportCache,
        min_fetch_interval: Duration,
    ) -> Self {
        Self {
            client,
            cache,
            min_fetch_interval,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Whether live upstream fetches are configured (an API key is present).
    #[must_use]
    pub fn upstream_configured(&self) -> bool {
        self.client.is_some()
    }

    /// The underlying cache, exposed for health reporting.
    #[must_use]
    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    /// Serves the market intelligence report.
    ///
    /// Prefers an unexpired cached report unless `force_refresh` is set.
    /// A refresh attempt is subject to the minimum-interval gate and the
    /// single-flight mutex; a failed refresh still serves any previously
    /// cached value.
    ///
    /// # Errors
    ///
    /// - [`IntelError::RateLimited`] when the minimum interval has not
    ///   elapsed and nothing is cached.
    /// - [`IntelError::Aggregation`] when a live fetch fails and nothing is
    ///   cached.
    pub async fn market_intelligence(
        &self,
        force_refresh: bool,
    ) -> Result<IntelligenceReport, IntelError> {
        let Some(client) = &self.client else {
            return Ok(self.serve_fallback().await);
        };

        if !force_refresh {
            if let Some(report) = self.cache.get_report().await {
                tracing::debug!("serving cached report");
                return Ok(report);
            }
        }

        let now = Utc::now();
        let last = self.cache.last_fetch().await;
        if !freshness::should_fetch(last, self.min_fetch_interval, now) {
            if let Some(report) = self.cache.get_report_any().await {
                tracing::info!("refresh gated by minimum fetch interval, serving cached report");
                return Ok(report);
            }
            let wait_seconds = freshness::wait_remaining(last, self.min_fetch_interval, now);
            return Err(IntelError::RateLimited { wait_seconds });
        }

        let _guard = self.refresh_gate.lock().await;

        // A concurrent request may have completed a refresh while this one
        // waited on the gate; its marker advance means its result is current.
        if self.cache.last_fetch().await != last {
            if let Some(report) = self.cache.get_report_any().await {
                tracing::debug!("refresh completed by a concurrent request, serving its result");
                return Ok(report);
            }
        }

        match self.aggregate(client).await {
            Ok(report) => Ok(report),
            Err(e) => {
                if let Some(stale) = self.cache.get_report_any().await {
                    tracing::warn!(error = %e, "refresh failed, serving last cached report");
                    Ok(stale)
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Dispatches the four category fetches concurrently and merges them.
    ///
    /// All-or-nothing: any category failure fails the whole aggregation and
    /// nothing is cached. On success the report is stamped, cached, and the
    /// `last_fetch` marker updated.
    async fn aggregate(&self, client: &SonarClient) -> Result<IntelligenceReport, IntelError> {
        tracing::info!("starting market intelligence aggregation");
        let (trends, insights, news, opportunities) = tokio::join!(
            client.fetch(Category::Trends),
            client.fetch(Category::Insights),
            client.fetch(Category::News),
            client.fetch(Category::Opportunities),
        );

        let mut failures: Vec<CategoryFailure> = Vec::new();

        let trends = match trends {
            Ok(CategoryData::Trends(payload)) => Some(payload),
            Ok(_) => {
                record_failure(&mut failures, Category::Trends, "unexpected payload variant");
                None
            }
            Err(e) => {
                record_failure(&mut failures, Category::Trends, &e.to_string());
                None
            }
        };
        let insights = match insights {
            Ok(CategoryData::Insights(items)) => Some(items),
            Ok(_) => {
                record_failure(&mut failures, Category::Insights, "unexpected payload variant");
                None
            }
            Err(e) => {
                record_failure(&mut failures, Category::Insights, &e.to_string());
                None
            }
        };
        let news = match news {
            Ok(CategoryData::News(items)) => Some(items),
            Ok(_) => {
                record_failure(&mut failures, Category::News, "unexpected payload variant");
                None
            }
            Err(e) => {
                record_failure(&mut failures, Category::News, &e.to_string());
                None
            }
        };
        let opportunities = match opportunities {
            Ok(CategoryData::Opportunities(items)) => Some(items),
            Ok(_) => {
                record_failure(
                    &mut failures,
                    Category::Opportunities,
                    "unexpected payload variant",
                );
                None
            }
            Err(e) => {
                record_failure(&mut failures, Category::Opportunities, &e.to_string());
                None
            }
        };

        if !failures.is_empty() {
            return Err(IntelError::Aggregation { failures });
        }

        let (Some(trends_payload), Some(insights), Some(news), Some(opportunities)) =
            (trends, insights, news, opportunities)
        else {
            return Err(IntelError::Aggregation { failures });
        };

        let report = IntelligenceReport {
            trends: trends_payload.trends,
            trend_timeline: trends_payload.trend_timeline,
            insights,
            news,
            opportunities,
            generated_at: Utc::now(),
        };

        self.cache.put_report(&report).await;
        self.cache.set_last_fetch(report.generated_at).await;
        tracing::info!(
            trends = report.trends.len(),
            timeline = report.trend_timeline.len(),
            insights = report.insights.len(),
            news = report.news.len(),
            opportunities = report.opportunities.len(),
            "aggregation complete, report cached"
        );
        Ok(report)
    }

    /// Static-fallback mode: no API key, so the built-in sample report is
    /// served (and cached, matching live-mode read paths).
    async fn serve_fallback(&self) -> IntelligenceReport {
        if let Some(report) = self.cache.get_report().await {
            return report;
        }
        tracing::info!("upstream not configured, serving static fallback report");
        let report = fallback::sample_report(Utc::now());
        self.cache.put_report(&report).await;
        report
    }
}

fn record_failure(failures: &mut Vec<CategoryFailure>, category: Category, message: &str) {
    tracing::error!(category = %category, error = %message, "category fetch failed");
    failures.push(CategoryFailure {
        category,
        message: message.to_string(),
    });
}

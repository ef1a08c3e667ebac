//! End-to-end aggregation tests using wiremock HTTP mocks.
//!
//! All four category fetches POST the same chat-completions endpoint, so
//! mocks are routed by distinctive substrings of each category's user
//! prompt.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use signal_cache::ReportCache;
use signal_intel::{fallback, IntelError, IntelService};
use signal_sonar::{Category, RetryPolicy, SonarClient};

const TRENDS_MARKER: &str = "adoption trajectory";
const INSIGHTS_MARKER: &str = "strategic marketing insights";
const NEWS_MARKER: &str = "past 48 hours";
const OPPORTUNITIES_MARKER: &str = "emerging market opportunities";

fn envelope(content: &str) -> serde_json::Value {
    json!({
        "id": "cmpl-test",
        "model": "sonar-pro",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": { "role": "assistant", "content": content }
        }]
    })
}

fn trends_payload() -> String {
    json!({
        "trends": [{
            "topic": "AI attribution",
            "metrics": ["40% accuracy gain"],
            "technical_details": "Shapley-value models",
            "adoption_rate": 0.45
        }],
        "trend_timeline": [{
            "period": "2026-Q2",
            "value": 61.0,
            "event": "Attribution consolidation",
            "milestone": "Enterprise majority"
        }]
    })
    .to_string()
}

fn insights_payload() -> String {
    json!({
        "insights": [{
            "area": "Personalization",
            "analysis": "Session context beats demographics",
            "implications": ["Invest in feature stores"],
            "case_study": "Spotify playlist personalization",
            "confidence_score": 0.85
        }]
    })
    .to_string()
}

fn news_payload() -> String {
    json!({
        "news": [{
            "headline": "OpenAI Partners with WPP",
            "category": "Industry Move",
            "summary": "Agency AI integration",
            "impact_analysis": "Faster delivery",
            "technical_implications": "API-first pipelines",
            "date": "2026-08-05",
            "source": "Campaign",
            "relevance_score": 0.9
        }]
    })
    .to_string()
}

fn opportunities_payload() -> String {
    json!({
        "opportunities": [{
            "domain": "Conversational Commerce",
            "technical_potential": "LLM shopping assistants",
            "requirements": ["Catalog grounding"],
            "roi_projection": "45% higher conversion",
            "complexity": "Medium",
            "market_readiness": 0.62
        }]
    })
    .to_string()
}

/// Mounts a 200 mock for one category, verified to serve exactly
/// `expected_calls` responses.
async fn mount_ok(server: &MockServer, marker: &str, payload: String, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains(marker))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&payload)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_failing(server: &MockServer, marker: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains(marker))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(server)
        .await;
}

fn live_service(base_url: &str, cache: ReportCache, min_interval: Duration) -> IntelService {
    let client = SonarClient::with_base_url("test-key", 30, RetryPolicy::new(0, 0), base_url)
        .expect("client construction should not fail");
    IntelService::new(Some(client), cache, min_interval)
}

#[tokio::test]
async fn full_success_aggregates_caches_and_serves_cached_after() {
    let server = MockServer::start().await;
    mount_ok(&server, TRENDS_MARKER, trends_payload(), 1).await;
    mount_ok(&server, INSIGHTS_MARKER, insights_payload(), 1).await;
    mount_ok(&server, NEWS_MARKER, news_payload(), 1).await;
    mount_ok(&server, OPPORTUNITIES_MARKER, opportunities_payload(), 1).await;

    let service = live_service(
        &server.uri(),
        ReportCache::memory_only(Duration::from_secs(60)),
        Duration::from_secs(300),
    );

    let report = service
        .market_intelligence(false)
        .await
        .expect("aggregation should succeed");
    assert_eq!(report.trends.len(), 1);
    assert_eq!(report.trend_timeline.len(), 1);
    assert_eq!(report.insights.len(), 1);
    assert_eq!(report.news.len(), 1);
    assert_eq!(report.opportunities.len(), 1);

    assert!(
        service.cache().last_fetch().await.is_some(),
        "successful aggregation records the fetch marker"
    );

    // Second request is served from cache; the expect(1) mocks verify no
    // second upstream round happened.
    let cached = service
        .market_intelligence(false)
        .await
        .expect("cached serve");
    assert_eq!(cached, report);
}

#[tokio::test]
async fn one_failing_category_fails_aggregation_and_caches_nothing() {
    let server = MockServer::start().await;
    mount_ok(&server, TRENDS_MARKER, trends_payload(), 1).await;
    mount_ok(&server, INSIGHTS_MARKER, insights_payload(), 1).await;
    mount_failing(&server, NEWS_MARKER).await;
    mount_ok(&server, OPPORTUNITIES_MARKER, opportunities_payload(), 1).await;

    let service = live_service(
        &server.uri(),
        ReportCache::memory_only(Duration::from_secs(60)),
        Duration::from_secs(300),
    );

    let err = service.market_intelligence(false).await.unwrap_err();
    match err {
        IntelError::Aggregation { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].category, Category::News);
            assert!(failures[0].message.contains("unavailable"));
        }
        other => panic!("expected Aggregation error, got {other:?}"),
    }

    assert!(
        service.cache().get_report_any().await.is_none(),
        "partial results must not be cached"
    );
}

#[tokio::test]
async fn every_failed_category_is_listed() {
    let server = MockServer::start().await;
    mount_ok(&server, TRENDS_MARKER, trends_payload(), 1).await;
    mount_ok(&server, INSIGHTS_MARKER, insights_payload(), 1).await;
    mount_failing(&server, NEWS_MARKER).await;
    mount_failing(&server, OPPORTUNITIES_MARKER).await;

    let service = live_service(
        &server.uri(),
        ReportCache::memory_only(Duration::from_secs(60)),
        Duration::from_secs(300),
    );

    let err = service.market_intelligence(false).await.unwrap_err();
    match err {
        IntelError::Aggregation { failures } => {
            let categories: Vec<Category> = failures.iter().map(|f| f.category).collect();
            assert_eq!(categories, vec![Category::News, Category::Opportunities]);
        }
        other => panic!("expected Aggregation error, got {other:?}"),
    }
}

#[tokio::test]
async fn freshness_gate_with_empty_cache_rate_limits() {
    let server = MockServer::start().await;
    // No mocks mounted: any upstream call would fail the test with a
    // non-RateLimited error.

    let cache = ReportCache::memory_only(Duration::from_secs(60));
    cache.set_last_fetch(Utc::now()).await;
    let service = live_service(&server.uri(), cache, Duration::from_secs(300));

    let err = service.market_intelligence(false).await.unwrap_err();
    match err {
        IntelError::RateLimited { wait_seconds } => {
            assert!(wait_seconds > 0, "wait hint must be positive");
            assert!(wait_seconds <= 300);
        }
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn freshness_gate_serves_stale_cache_instead_of_fetching() {
    let server = MockServer::start().await;

    let cache = ReportCache::memory_only(Duration::ZERO);
    let stale = fallback::sample_report(Utc::now());
    cache.put_report(&stale).await;
    cache.set_last_fetch(Utc::now()).await;

    let service = live_service(&server.uri(), cache, Duration::from_secs(300));
    let served = service
        .market_intelligence(false)
        .await
        .expect("stale cache preferred over fetching");
    assert_eq!(served, stale);
}

#[tokio::test]
async fn failed_refresh_serves_stale_cache() {
    let server = MockServer::start().await;
    mount_failing(&server, TRENDS_MARKER).await;
    mount_failing(&server, INSIGHTS_MARKER).await;
    mount_failing(&server, NEWS_MARKER).await;
    mount_failing(&server, OPPORTUNITIES_MARKER).await;

    let cache = ReportCache::memory_only(Duration::ZERO);
    let stale = fallback::sample_report(Utc::now());
    cache.put_report(&stale).await;

    let service = live_service(&server.uri(), cache, Duration::from_secs(300));
    let served = service
        .market_intelligence(false)
        .await
        .expect("stale cache preferred over surfacing the error");
    assert_eq!(served, stale);
}

#[tokio::test]
async fn concurrent_requests_share_one_upstream_round() {
    let server = MockServer::start().await;
    mount_ok(&server, TRENDS_MARKER, trends_payload(), 1).await;
    mount_ok(&server, INSIGHTS_MARKER, insights_payload(), 1).await;
    mount_ok(&server, NEWS_MARKER, news_payload(), 1).await;
    mount_ok(&server, OPPORTUNITIES_MARKER, opportunities_payload(), 1).await;

    let service = Arc::new(live_service(
        &server.uri(),
        ReportCache::memory_only(Duration::from_secs(60)),
        Duration::from_secs(300),
    ));

    let a = Arc::clone(&service);
    let b = Arc::clone(&service);
    let (first, second) = tokio::join!(
        tokio::spawn(async move { a.market_intelligence(false).await }),
        tokio::spawn(async move { b.market_intelligence(false).await }),
    );

    let first = first.expect("task").expect("first request succeeds");
    let second = second.expect("task").expect("second request succeeds");
    assert_eq!(
        first, second,
        "both requests observe the single refreshed report"
    );
}

#[tokio::test]
async fn force_refresh_bypasses_fresh_cache() {
    let server = MockServer::start().await;
    mount_ok(&server, TRENDS_MARKER, trends_payload(), 2).await;
    mount_ok(&server, INSIGHTS_MARKER, insights_payload(), 2).await;
    mount_ok(&server, NEWS_MARKER, news_payload(), 2).await;
    mount_ok(&server, OPPORTUNITIES_MARKER, opportunities_payload(), 2).await;

    // Zero minimum interval so the forced second round is not gated.
    let service = live_service(
        &server.uri(),
        ReportCache::memory_only(Duration::from_secs(60)),
        Duration::ZERO,
    );

    let first = service
        .market_intelligence(false)
        .await
        .expect("initial aggregation");
    let second = service
        .market_intelligence(true)
        .await
        .expect("forced refresh");
    assert!(
        second.generated_at >= first.generated_at,
        "forced refresh produces a new report"
    );
}

#[tokio::test]
async fn fallback_mode_serves_and_caches_sample_report() {
    let service = IntelService::new(
        None,
        ReportCache::memory_only(Duration::from_secs(60)),
        Duration::from_secs(300),
    );
    assert!(!service.upstream_configured());

    let report = service
        .market_intelligence(false)
        .await
        .expect("fallback mode always serves");
    assert!(!report.trends.is_empty());
    assert!(!report.trend_timeline.is_empty());
    assert!(!report.insights.is_empty());
    assert!(!report.news.is_empty());
    assert!(!report.opportunities.is_empty());

    let again = service
        .market_intelligence(false)
        .await
        .expect("cached fallback");
    assert_eq!(
        again.generated_at, report.generated_at,
        "second request is served from cache, not regenerated"
    );
}

//! HTTP surface: route table and handlers.
//!
//! The wire shapes are fixed for frontend compatibility: the intelligence
//! endpoint serves the bare report JSON, failures serve `{"error": …}`, and
//! rate limiting serves `{"message": …, "wait_seconds": …}`.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use signal_intel::{IntelError, IntelService};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState};

#[derive(Clone)]
pub struct AppState {
    pub intel: Arc<IntelService>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshParams {
    /// `?refresh=true` forces a refresh attempt; still subject to the
    /// freshness gate and the per-origin limiter.
    #[serde(default)]
    refresh: bool,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct RateLimitedBody {
    message: String,
    wait_seconds: u64,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
    version: &'static str,
    perplexity: &'static str,
    redis: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let intel_routes = Router::new()
        .route("/api/market-intelligence", get(market_intelligence))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ));

    Router::new()
        .route("/api/health", get(health))
        .route("/health", get(health))
        .merge(intel_routes)
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn market_intelligence(
    State(state): State<AppState>,
    Query(params): Query<RefreshParams>,
) -> Response {
    match state.intel.market_intelligence(params.refresh).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(IntelError::RateLimited { wait_seconds }) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(RateLimitedBody {
                message: "refresh not permitted yet, retry later".to_string(),
                wait_seconds,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "market intelligence request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let redis = if state.intel.cache().backend_connected().await {
        "connected"
    } else {
        "disconnected"
    };
    let perplexity = if state.intel.upstream_configured() {
        "configured"
    } else {
        "not configured"
    };

    (
        StatusCode::OK,
        Json(HealthBody {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            perplexity,
            redis,
        }),
    )
}

use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Per-origin rolling-window rate limiter state.
///
/// Keyed by client IP; an origin may trigger at most `max_requests`
/// intelligence requests inside any rolling `window`. Origins whose
/// timestamps have all aged out of the window are evicted on every check so
/// the table stays bounded. Injected into the router rather than held as a
/// process global.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    origins: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            origins: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Records a request from `origin`, or returns the seconds to wait when
    /// the origin is over its budget.
    async fn check(&self, origin: IpAddr) -> Result<(), u64> {
        let now = Instant::now();
        let mut origins = self.origins.lock().await;

        origins.retain(|_, stamps| {
            stamps.retain(|t| now.duration_since(*t) < self.window);
            !stamps.is_empty()
        });

        let stamps = origins.entry(origin).or_default();
        if stamps.len() >= self.max_requests {
            // Oldest in-window stamp decides when the next slot opens.
            let wait = stamps
                .first()
                .map(|oldest| self.window.saturating_sub(now.duration_since(*oldest)))
                .unwrap_or(self.window);
            let secs = wait.as_secs() + u64::from(wait.subsec_nanos() > 0);
            return Err(secs.max(1));
        }

        stamps.push(now);
        Ok(())
    }

    #[cfg(test)]
    async fn tracked_origins(&self) -> usize {
        self.origins.lock().await.len()
    }
}

#[derive(Debug, Serialize)]
struct RateLimitedBody {
    message: &'static str,
    wait_seconds: u64,
}

/// Axum middleware that extracts or generates a request ID.
///
/// If the incoming request has an `x-request-id` header, that value is used.
/// Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`RequestId`]
/// - Set on the response as the `x-request-id` header
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

/// Middleware enforcing the per-origin request budget.
///
/// Over-budget requests fail fast with 429 and a positive `wait_seconds`
/// hint, without consulting the upstream at all.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let origin = client_ip(&req);
    match rate_limit.check(origin).await {
        Ok(()) => next.run(req).await,
        Err(wait_seconds) => {
            tracing::warn!(%origin, wait_seconds, "request rate limited");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(RateLimitedBody {
                    message: "rate limit exceeded, retry later",
                    wait_seconds,
                }),
            )
                .into_response()
        }
    }
}

/// Client IP from the connection info; requests without one (router tests)
/// share a single unspecified-origin bucket.
fn client_ip(req: &Request) -> IpAddr {
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ci| ci.0.ip())
}

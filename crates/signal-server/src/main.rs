mod api;
mod middleware;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use signal_cache::{RedisStore, ReportCache};
use signal_intel::IntelService;
use signal_sonar::{RetryPolicy, SonarClient};

use crate::api::{build_app, AppState};
use crate::middleware::RateLimitState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = signal_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(env = %config.env, "starting neural-signal server");

    // A dead cache backend degrades to memory-only; it never blocks startup.
    let redis = match RedisStore::connect(&config.redis_url).await {
        Ok(store) => {
            tracing::info!("cache backend connected");
            Some(store)
        }
        Err(e) => {
            tracing::warn!(error = %e, "cache backend unreachable, running memory-only");
            None
        }
    };
    let cache = ReportCache::new(redis, Duration::from_secs(config.cache_ttl_secs));

    let client = match config.perplexity_api_key.as_deref() {
        Some(key) => {
            let policy = RetryPolicy::new(config.max_retries, config.retry_backoff_base_ms);
            Some(SonarClient::with_base_url(
                key,
                config.request_timeout_secs,
                policy,
                &config.sonar_base_url,
            )?)
        }
        None => {
            tracing::warn!("PERPLEXITY_API_KEY not set, serving static fallback data");
            None
        }
    };

    let intel = Arc::new(IntelService::new(
        client,
        cache,
        Duration::from_secs(config.min_fetch_interval_secs),
    ));
    let rate_limit = RateLimitState::new(
        config.rate_limit_requests,
        Duration::from_secs(config.rate_limit_window_secs),
    );
    let app = build_app(AppState { intel }, rate_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}

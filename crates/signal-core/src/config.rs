use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if values are present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SIGNAL_ENV", "development"));
    let bind_addr = parse_addr("SIGNAL_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("SIGNAL_LOG_LEVEL", "info");

    // Missing key is not an error: the service degrades to the static
    // fallback dataset rather than refusing to start.
    let perplexity_api_key = lookup("PERPLEXITY_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty());

    let redis_url = or_default("REDIS_URL", "redis://127.0.0.1:6379");
    let cache_ttl_secs = parse_u64("CACHE_TTL", "1800")?;
    let min_fetch_interval_secs = parse_u64("SIGNAL_MIN_FETCH_INTERVAL_SECS", "300")?;
    let rate_limit_requests = parse_usize("SIGNAL_RATE_LIMIT_REQUESTS", "2")?;
    let rate_limit_window_secs = parse_u64("SIGNAL_RATE_LIMIT_WINDOW_SECS", "60")?;
    let sonar_base_url = or_default("SIGNAL_SONAR_BASE_URL", "https://api.perplexity.ai");
    let request_timeout_secs = parse_u64("SIGNAL_REQUEST_TIMEOUT_SECS", "45")?;
    let max_retries = parse_u32("SIGNAL_MAX_RETRIES", "3")?;
    let retry_backoff_base_ms = parse_u64("SIGNAL_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        perplexity_api_key,
        redis_url,
        cache_ttl_secs,
        min_fetch_interval_secs,
        rate_limit_requests,
        rate_limit_window_secs,
        sonar_base_url,
        request_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

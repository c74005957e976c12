use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::Context;
use balviz_core::constants::DEFAULT_QUERY_TIMEOUT_SECS;
use balviz_storage_sqlite::PoolSettings;

/// Headroom the request deadline keeps over the storage deadline.
const REQUEST_TIMEOUT_MARGIN_MS: u64 = 1_000;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub query_timeout: Duration,
    pub pool: PoolSettings,
    /// Heat map masking when the request does not say.
    pub mask_identifiers: bool,
    /// Fixed seed for placeholder metrics; entropy when unset.
    pub placeholder_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("BALVIZ_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid BALVIZ_LISTEN_ADDR")?;
        let db_path = std::env::var("BALVIZ_DB_PATH").unwrap_or_else(|_| "./db/balviz.db".into());
        let cors_allow = std::env::var("BALVIZ_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let request_timeout_ms: u64 = env_or("BALVIZ_REQUEST_TIMEOUT_MS", 15_000);
        let query_timeout_ms: u64 =
            env_or("BALVIZ_QUERY_TIMEOUT_MS", DEFAULT_QUERY_TIMEOUT_SECS * 1000);

        let defaults = PoolSettings::default();
        let pool = PoolSettings {
            max_size: env_or("BALVIZ_DB_MAX_CONNECTIONS", defaults.max_size),
            min_idle: env_or("BALVIZ_DB_MIN_IDLE", defaults.min_idle),
            max_lifetime: Duration::from_secs(env_or(
                "BALVIZ_DB_MAX_LIFETIME_SECS",
                defaults.max_lifetime.as_secs(),
            )),
            connection_timeout: defaults.connection_timeout,
        };

        let mask_identifiers = env_or("BALVIZ_MASK_IDENTIFIERS", true);
        let placeholder_seed = std::env::var("BALVIZ_PLACEHOLDER_SEED")
            .ok()
            .and_then(|v| v.trim().parse().ok());

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: request_deadline(request_timeout_ms, query_timeout_ms),
            query_timeout: Duration::from_millis(query_timeout_ms),
            pool,
            mask_identifiers,
            placeholder_seed,
        })
    }
}

/// Reads and parses `key`, falling back to `default` when unset or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Request deadline, never shorter than the storage deadline plus a margin.
/// A slow read then fails as a storage error (500) instead of a 408.
fn request_deadline(request_timeout_ms: u64, query_timeout_ms: u64) -> Duration {
    let floor = query_timeout_ms.saturating_add(REQUEST_TIMEOUT_MARGIN_MS);
    if request_timeout_ms < floor {
        tracing::warn!(
            "BALVIZ_REQUEST_TIMEOUT_MS={} is below the query timeout; using {}",
            request_timeout_ms,
            floor
        );
    }
    Duration::from_millis(request_timeout_ms.max(floor))
}

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use anyhow::Context;
use balviz_core::aggregation::{AggregationService, AggregationServiceTrait};
use balviz_storage_sqlite::{accounts::AccountRepository, db};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const STARTUP_PING_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AppState {
    pub aggregation_service: Arc<dyn AggregationServiceTrait>,
    pub mask_identifiers: bool,
    pub placeholder_seed: Option<u64>,
}

impl AppState {
    /// Generator for one request's placeholder metrics.
    pub fn placeholder_rng(&self) -> StdRng {
        match self.placeholder_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("BALVIZ_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path, &config.pool)?;
    db::run_migrations(&pool)?;

    let repository = Arc::new(AccountRepository::new(pool));
    let aggregation_service = Arc::new(AggregationService::new(
        repository,
        config.query_timeout,
    ));

    tokio::time::timeout(STARTUP_PING_TIMEOUT, aggregation_service.check_ready())
        .await
        .context("Database did not answer the startup ping")??;

    if let Some(seed) = config.placeholder_seed {
        tracing::info!("Placeholder metrics use fixed seed {}", seed);
    }

    Ok(Arc::new(AppState {
        aggregation_service,
        mask_identifiers: config.mask_identifiers,
        placeholder_seed: config.placeholder_seed,
    }))
}

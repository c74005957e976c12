use std::{sync::Arc, time::Duration};

use crate::{
    config::Config,
    error::ApiResult,
    main_lib::AppState,
    models::{FilterRequest, HeatmapRequest, TreeMapLeaf, TreeMapNode},
};
use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

mod heatmap;
mod treemap;

const CORS_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

#[utoipa::path(get, path = "/api/healthz", responses((status = 200, description = "Healthy")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[utoipa::path(
    get,
    path = "/api/readyz",
    responses(
        (status = 200, description = "Ready"),
        (status = 500, description = "Database unreachable")
    )
)]
pub async fn readyz(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    state.aggregation_service.check_ready().await?;
    Ok("ok")
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz,
        readyz,
        treemap::tree_data,
        treemap::filter_data,
        heatmap::heatmap_data
    ),
    components(schemas(FilterRequest, HeatmapRequest, TreeMapNode, TreeMapLeaf)),
    tags((name = "balviz"))
)]
pub struct ApiDoc;

/// CORS policy for a single route: its own method plus preflight.
pub(crate) fn cors_for(config: &Config, method: Method) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([method, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE);

    if config.cors_allow.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        cors.allow_origin(origins)
    }
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .merge(treemap::router(config));

    Router::new()
        .nest("/api", api)
        .merge(heatmap::router(config))
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

use std::sync::Arc;

use crate::{
    api::cors_for,
    config::Config,
    error::ApiResult,
    main_lib::AppState,
    models::{to_nodes, FilterRequest, TreeMapNode},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::Method,
    routing::{get, post},
    Json, Router,
};
use balviz_core::aggregation::GroupingKey;

/// Every account grouped by currency, with placeholder magnitudes.
#[utoipa::path(
    get,
    path = "/api/treedata",
    responses(
        (status = 200, body = [TreeMapNode]),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn tree_data(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<TreeMapNode>>> {
    let mut rng = state.placeholder_rng();
    let groups = state.aggregation_service.tree_data(&mut rng).await?;
    Ok(Json(to_nodes(groups)))
}

#[utoipa::path(
    post,
    path = "/api/filterdata",
    request_body = FilterRequest,
    responses(
        (status = 200, body = [TreeMapNode]),
        (status = 400, description = "Malformed body or unsupported filter"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn filter_data(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FilterRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<TreeMapNode>>> {
    let Json(request) = payload?;
    let key = GroupingKey::from_account_column(&request.filter)?;

    let mut rng = state.placeholder_rng();
    let groups = state.aggregation_service.filter_data(key, &mut rng).await?;
    Ok(Json(to_nodes(groups)))
}

pub fn router(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/treedata",
            get(tree_data).layer(cors_for(config, Method::GET)),
        )
        .route(
            "/filterdata",
            post(filter_data).layer(cors_for(config, Method::POST)),
        )
}

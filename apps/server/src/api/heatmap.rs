use std::sync::Arc;

use crate::{
    api::cors_for,
    config::Config,
    error::ApiResult,
    main_lib::AppState,
    models::{to_nodes, HeatmapRequest, TreeMapNode},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::Method,
    routing::post,
    Json, Router,
};
use balviz_core::aggregation::GroupingKey;

/// Latest balance of every account, grouped, with the opening-to-closing
/// percentage change as the metric.
#[utoipa::path(
    post,
    path = "/heatmap/filterdata",
    request_body = HeatmapRequest,
    responses(
        (status = 200, body = [TreeMapNode]),
        (status = 400, description = "Malformed body or unsupported groupby"),
        (status = 500, description = "Storage or decode failure")
    )
)]
pub async fn heatmap_data(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HeatmapRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<TreeMapNode>>> {
    let Json(request) = payload?;
    let key = GroupingKey::from_balance_column(&request.groupby)?;
    let mask = request.mask.unwrap_or(state.mask_identifiers);

    let groups = state.aggregation_service.heatmap(key, mask).await?;
    Ok(Json(to_nodes(groups)))
}

pub fn router(config: &Config) -> Router<Arc<AppState>> {
    Router::new().route(
        "/heatmap/filterdata",
        post(heatmap_data).layer(cors_for(config, Method::POST)),
    )
}

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use balviz_core::aggregation::{AggregationServiceTrait, GroupedResult, GroupingKey};
use balviz_server::{api::app_router, build_state, config::Config, AppState};
use balviz_storage_sqlite::schema::{account_balance, accounts};
use balviz_storage_sqlite::{create_pool, get_connection, DbPool, PoolSettings};
use diesel::prelude::*;
use rand::RngCore;
use serde_json::Value;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

fn test_config(db_path: String) -> Config {
    Config {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        db_path,
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(10),
        query_timeout: Duration::from_secs(5),
        pool: PoolSettings {
            max_size: 4,
            min_idle: 1,
            ..PoolSettings::default()
        },
        mask_identifiers: true,
        placeholder_seed: None,
    }
}

/// Full stack on a migrated temp database. The returned pool is used to seed rows.
async fn setup(config_fn: impl FnOnce(&mut Config)) -> (Router, Arc<DbPool>, TempDir) {
    let tmp = tempdir().unwrap();
    let db_path = tmp.path().join("test.db").to_string_lossy().to_string();
    let mut config = test_config(db_path.clone());
    config_fn(&mut config);

    let state = build_state(&config).await.unwrap();
    let app = app_router(state, &config);
    let seed_pool = create_pool(&db_path, &config.pool).unwrap();
    (app, seed_pool, tmp)
}

fn insert_account(pool: &DbPool, no: &str, ccy: &str, country: &str) {
    let mut conn = get_connection(pool).unwrap();
    diesel::insert_into(accounts::table)
        .values((
            accounts::account_no.eq(no),
            accounts::account_ccy.eq(ccy),
            accounts::account_country.eq(country),
        ))
        .execute(&mut conn)
        .unwrap();
}

fn insert_balance(
    pool: &DbPool,
    no: &str,
    date: &str,
    ccy: &str,
    opening: (&str, &str),
    closing: (&str, &str),
) {
    let mut conn = get_connection(pool).unwrap();
    diesel::insert_into(account_balance::table)
        .values((
            account_balance::account_no.eq(no),
            account_balance::snapshot_date.eq(date),
            account_balance::opening_balance_currency.eq(ccy),
            account_balance::country_id.eq("US"),
            account_balance::opening_balance_amount.eq(opening.0),
            account_balance::opening_balance_indicator.eq(opening.1),
            account_balance::closing_balance_amount.eq(closing.0),
            account_balance::closing_balance_indicator.eq(closing.1),
        ))
        .execute(&mut conn)
        .unwrap();
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn group_keys(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|g| g["key"].as_str().unwrap())
        .collect()
}

// ============== Service stub for request validation ==============

#[derive(Default)]
struct CountingService {
    calls: AtomicUsize,
}

#[async_trait]
impl AggregationServiceTrait for CountingService {
    async fn tree_data(
        &self,
        _rng: &mut (dyn RngCore + Send),
    ) -> balviz_core::Result<GroupedResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn filter_data(
        &self,
        _key: GroupingKey,
        _rng: &mut (dyn RngCore + Send),
    ) -> balviz_core::Result<GroupedResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn heatmap(&self, _key: GroupingKey, _mask: bool) -> balviz_core::Result<GroupedResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn check_ready(&self) -> balviz_core::Result<()> {
        Ok(())
    }
}

fn stub_app() -> (Router, Arc<CountingService>) {
    let service = Arc::new(CountingService::default());
    let state = Arc::new(AppState {
        aggregation_service: service.clone(),
        mask_identifiers: true,
        placeholder_seed: None,
    });
    let config = test_config("unused.db".to_string());
    (app_router(state, &config), service)
}

// ============== Tree map ==============

#[tokio::test]
async fn treedata_groups_accounts_by_currency() {
    let (app, pool, _tmp) = setup(|_| {}).await;
    insert_account(&pool, "100200300", "USD", "US");
    insert_account(&pool, "100200301", "EUR", "DE");
    insert_account(&pool, "100200302", "USD", "CA");

    let (status, body) = send(&app, get("/api/treedata")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(group_keys(&body), vec!["EUR", "USD"]);
    let usd = body[1]["data"].as_array().unwrap();
    assert_eq!(usd.len(), 2);
    assert_eq!(usd[0]["key"], "100200300");
    for entry in usd {
        let value = entry["data"].as_u64().unwrap();
        assert!((10..=60).contains(&value));
    }
}

#[tokio::test]
async fn treedata_empty_store_returns_empty_array() {
    let (app, _pool, _tmp) = setup(|_| {}).await;

    let (status, body) = send(&app, get("/api/treedata")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::Array(vec![]));
}

#[tokio::test]
async fn treedata_is_reproducible_with_fixed_seed() {
    let (app, pool, _tmp) = setup(|c| c.placeholder_seed = Some(7)).await;
    insert_account(&pool, "100200300", "USD", "US");
    insert_account(&pool, "100200301", "EUR", "DE");

    let (_, first) = send(&app, get("/api/treedata")).await;
    let (_, second) = send(&app, get("/api/treedata")).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn filterdata_groups_by_country() {
    let (app, pool, _tmp) = setup(|_| {}).await;
    insert_account(&pool, "100200300", "USD", "US");
    insert_account(&pool, "100200301", "EUR", "DE");
    insert_account(&pool, "100200302", "USD", "US");

    let (status, body) = send(
        &app,
        post_json("/api/filterdata", r#"{"filter":"account_country"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(group_keys(&body), vec!["DE", "US"]);
    assert_eq!(body[1]["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn filterdata_unsupported_filter_is_rejected_before_storage() {
    let (app, service) = stub_app();

    let (status, body) = send(&app, post_json("/api/filterdata", r#"{"filter":"foo"}"#)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert!(body["message"].as_str().unwrap().contains("foo"));
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let (app, service) = stub_app();

    let requests = vec![
        post_json("/api/filterdata", "{not json"),
        post_json("/api/filterdata", r#"{"groupby":"account_ccy"}"#),
        post_json("/heatmap/filterdata", r#"{"groupby": 5}"#),
        Request::builder()
            .method("POST")
            .uri("/api/filterdata")
            .body(Body::from(r#"{"filter":"account_ccy"}"#))
            .unwrap(),
    ];

    for request in requests {
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
    }
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

// ============== Heat map ==============

#[tokio::test]
async fn heatmap_uses_latest_snapshot_and_masks() {
    let (app, pool, _tmp) = setup(|_| {}).await;
    insert_balance(&pool, "123456789012", "2024-05-31", "USD", ("10", "CRDT"), ("10", "CRDT"));
    insert_balance(&pool, "123456789012", "2024-06-30", "USD", ("80", "CRDT"), ("100", "CRDT"));
    insert_balance(&pool, "987654321098", "2024-06-30", "EUR", ("100", "DBIT"), ("100", "CRDT"));

    let (status, body) = send(
        &app,
        post_json(
            "/heatmap/filterdata",
            r#"{"groupby":"opening_balance_currency"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(group_keys(&body), vec!["EUR", "USD"]);
    assert_eq!(body[0]["data"][0]["key"], "9876***98");
    assert_eq!(body[0]["data"][0]["data"].as_f64(), Some(200.0));
    let usd = body[1]["data"].as_array().unwrap();
    assert_eq!(usd.len(), 1);
    assert_eq!(usd[0]["key"], "1234***12");
    assert_eq!(usd[0]["data"].as_f64(), Some(20.0));
}

#[tokio::test]
async fn heatmap_unmasked_on_request() {
    let (app, pool, _tmp) = setup(|_| {}).await;
    insert_balance(&pool, "123456789012", "2024-06-30", "USD", ("100", "CRDT"), ("0", "CRDT"));

    let (status, body) = send(
        &app,
        post_json("/heatmap/filterdata", r#"{"groupby":"country_id","mask":false}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(group_keys(&body), vec!["US"]);
    assert_eq!(body[0]["data"][0]["key"], "123456789012");
    assert_eq!(body[0]["data"][0]["data"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn heatmap_rejects_account_filter_names() {
    let (app, service) = stub_app();

    let (status, _) = send(
        &app,
        post_json("/heatmap/filterdata", r#"{"groupby":"account_ccy"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(service.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn heatmap_undecodable_indicator_is_server_error() {
    let (app, pool, _tmp) = setup(|_| {}).await;
    insert_balance(&pool, "123456789012", "2024-06-30", "USD", ("80", "XXXX"), ("100", "CRDT"));

    let (status, body) = send(
        &app,
        post_json("/heatmap/filterdata", r#"{"groupby":"country_id"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 500);
    assert!(body.get("data").is_none());
}

// ============== Cross-cutting ==============

#[tokio::test]
async fn cors_preflight_is_per_route() {
    let (app, _) = stub_app();

    let preflight = |uri: &str, method: &str| {
        Request::builder()
            .method("OPTIONS")
            .uri(uri)
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", method)
            .header("access-control-request-headers", "content-type")
            .body(Body::empty())
            .unwrap()
    };

    let response = app
        .clone()
        .oneshot(preflight("/api/filterdata", "POST"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-max-age"], "86400");
    let methods = headers["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
    assert!(!methods.contains("GET"));

    let response = app
        .clone()
        .oneshot(preflight("/api/treedata", "GET"))
        .await
        .unwrap();
    let methods = response.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap();
    assert!(methods.contains("GET"));
    assert!(!methods.contains("POST"));
}

#[tokio::test]
async fn health_endpoints() {
    let (app, _pool, _tmp) = setup(|_| {}).await;

    let response = app.clone().oneshot(get("/api/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/readyz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let (app, _) = stub_app();

    let response = app.oneshot(get("/api/treedata")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn openapi_document_lists_endpoints() {
    let (app, _) = stub_app();

    let (status, body) = send(&app, get("/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/treedata"));
    assert!(paths.contains_key("/api/filterdata"));
    assert!(paths.contains_key("/heatmap/filterdata"));
}

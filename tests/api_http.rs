// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /api/news (envelope, party filter, limit)
// - GET /api/snapshot/errors
// - GET /api/districts, /api/predictions
// - GET /admin/refresh (single-flight rule)

use std::sync::Arc;

use axum::{
    body::{self, Body},
    Router,
};
use http::{Request, StatusCode};
use serde_json::Value as Json;
use tower::ServiceExt as _; // for `oneshot`

use election_news_aggregator::api::{self, AppState};
use election_news_aggregator::cache::SnapshotCache;
use election_news_aggregator::classify::Classifier;
use election_news_aggregator::config::AppConfig;
use election_news_aggregator::ingest::registry::SourceRegistry;
use election_news_aggregator::ingest::PipelineRunner;
use election_news_aggregator::sample;

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses, seeded with the bootstrap sample
/// and a runner over an empty registry (no network in tests).
fn test_state() -> AppState {
    let cache = Arc::new(SnapshotCache::new(sample::bootstrap_snapshot(
        &Classifier::seed(),
    )));
    let runner = Arc::new(PipelineRunner::new(
        SourceRegistry::empty(),
        Classifier::seed(),
        AppConfig::default(),
        reqwest::Client::new(),
        cache.clone(),
    ));
    AppState { cache, runner }
}

fn test_router() -> Router {
    api::router(test_state())
}

async fn get_json(app: Router, uri: &str) -> Json {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .expect("build request");
    let resp = app.oneshot(req).await.expect("oneshot");
    assert!(
        resp.status().is_success(),
        "GET {uri} should be 2xx, got {}",
        resp.status()
    );
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json")
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK, "health should be 200");

    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    let body = String::from_utf8(bytes).expect("utf8");
    assert_eq!(body.trim(), "OK", "health body should be 'OK'");
}

#[tokio::test]
async fn api_news_returns_the_envelope_fields() {
    let v = get_json(test_router(), "/api/news").await;

    assert_eq!(v["success"], true);
    assert!(v["data"].is_array(), "missing 'data'");
    assert!(v["total"].is_number(), "missing 'total'");
    assert!(v["generated_at"].is_string(), "missing 'generated_at'");
    assert_eq!(v["sample_data"], true, "bootstrap must be flagged");

    // The bootstrap sample has 11 items, under the default limit of 20.
    assert_eq!(v["total"], 11);
    assert_eq!(v["data"].as_array().unwrap().len(), 11);
}

#[tokio::test]
async fn api_news_party_filter_matches_tagged_items_only() {
    let v = get_json(test_router(), "/api/news?party=ldp").await;

    let data = v["data"].as_array().unwrap();
    assert!(!data.is_empty(), "sample has ldp-tagged items");
    for item in data {
        let tags: Vec<&str> = item["tags"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t.as_str().unwrap())
            .collect();
        assert!(tags.contains(&"ldp"), "item not tagged ldp: {item}");
    }
    assert_eq!(v["total"], data.len());
}

#[tokio::test]
async fn api_news_party_all_disables_the_filter() {
    let all = get_json(test_router(), "/api/news?party=all").await;
    let bare = get_json(test_router(), "/api/news").await;
    assert_eq!(all["total"], bare["total"]);
}

#[tokio::test]
async fn api_news_unknown_party_matches_nothing() {
    let v = get_json(test_router(), "/api/news?party=whigs").await;
    assert_eq!(v["success"], true);
    assert_eq!(v["total"], 0);
    assert!(v["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn api_news_limit_truncates_after_filtering() {
    let v = get_json(test_router(), "/api/news?limit=3").await;
    assert_eq!(v["data"].as_array().unwrap().len(), 3);
    // total counts the filtered sequence before the limit.
    assert_eq!(v["total"], 11);
}

#[tokio::test]
async fn api_news_items_stay_ranked() {
    let v = get_json(test_router(), "/api/news").await;
    let dates: Vec<String> = v["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["published_at"].as_str().unwrap().to_string())
        .collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a)); // RFC 3339 sorts lexicographically
    assert_eq!(dates, sorted);
}

#[tokio::test]
async fn api_snapshot_errors_exposes_generation_metadata() {
    let v = get_json(test_router(), "/api/snapshot/errors").await;
    assert_eq!(v["success"], true);
    assert_eq!(v["sample_data"], true);
    assert!(v["source_errors"].is_object());
}

#[tokio::test]
async fn api_districts_serves_the_directory() {
    let v = get_json(test_router(), "/api/districts").await;
    assert_eq!(v["success"], true);
    let data = v["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data[0]["name"], "北海道1区");
    assert!(data[0]["candidates"].as_array().unwrap().len() >= 2);
}

#[tokio::test]
async fn api_predictions_serves_the_stub_table() {
    let v = get_json(test_router(), "/api/predictions").await;
    assert_eq!(v["success"], true);
    let preds = v["data"]["predictions"].as_array().unwrap();
    assert!(!preds.is_empty());
    assert_eq!(preds[0]["party"], "ldp");
    assert_eq!(preds[0]["current_seats"], 247);
}

#[tokio::test]
async fn admin_refresh_respects_the_single_flight_rule() {
    let state = test_state();
    let app = api::router(state.clone());

    // Simulate an in-flight cycle.
    let guard = state.runner.single_flight().try_acquire().expect("guard");

    let req = Request::builder()
        .method("GET")
        .uri("/admin/refresh")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), "busy");

    drop(guard);

    let req = Request::builder()
        .method("GET")
        .uri("/admin/refresh")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), "triggered");
}

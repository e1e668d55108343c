// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health
// - GET /            (UI page with defaults)
// - POST /analyze    (204 / ok / warning / error shapes)

mod common;

use std::path::Path;
use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use common::{scenario_scorer, scenario_titles, StubNews};
use stock_news_sentiment::api::{router, AppState};
use stock_news_sentiment::config::AppConfig;

const BODY_LIMIT: usize = 4 * 1024 * 1024;

fn app_with(news: StubNews) -> Router {
    let state = AppState::new(Arc::new(news), Arc::new(scenario_scorer()), &AppConfig::default());
    router(state, Path::new("static"))
}

async fn post_analyze(app: Router, payload: Json) -> (StatusCode, Vec<u8>) {
    let req = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build POST /analyze");
    let resp = app.oneshot(req).await.expect("oneshot /analyze");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, bytes)
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = app_with(StubNews::with_titles(&[]));
    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    assert_eq!(String::from_utf8(bytes.to_vec()).unwrap(), "ok");
}

#[tokio::test]
async fn api_index_serves_ui_with_defaults() {
    let app = app_with(StubNews::with_titles(&[]));
    let req = Request::builder().uri("/").body(Body::empty()).unwrap();

    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Stock News Sentiment Analysis"));
    assert!(html.contains("Input Parameters"));
    assert!(html.contains(r#"id="ticker" type="text" value="GOOG""#));
    assert!(html.contains(r#"type="password""#));
}

#[tokio::test]
async fn api_analyze_without_key_or_ticker_is_not_run() {
    let news = Arc::new(StubNews::with_titles(&scenario_titles()));
    let state = AppState::new(news.clone(), Arc::new(scenario_scorer()), &AppConfig::default());
    let app = router(state, Path::new("static"));

    let (st, body) = post_analyze(app.clone(), json!({ "api_key": "", "ticker": "GOOG" })).await;
    assert_eq!(st, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (st, _) = post_analyze(app, json!({ "api_key": "k", "ticker": "  " })).await;
    assert_eq!(st, StatusCode::NO_CONTENT);

    assert!(news.calls().is_empty(), "news source must not be called");
}

#[tokio::test]
async fn api_analyze_returns_scores_markers_and_charts() {
    let app = app_with(StubNews::with_titles(&scenario_titles()));

    let (st, bytes) = post_analyze(
        app,
        json!({ "api_key": "k", "ticker": "GOOG", "threshold": 0.1 }),
    )
    .await;
    assert_eq!(st, StatusCode::OK);

    let v: Json = serde_json::from_slice(&bytes).expect("parse analyze json");
    assert_eq!(v["status"], json!("ok"));
    assert_eq!(v["ticker"], json!("GOOG"));
    assert_eq!(v["scores"], json!([0.5, -0.2, 0.1]));
    assert_eq!(v["buy_indices"], json!([0, 2]));
    assert_eq!(v["buy_count"], json!(2));
    assert_eq!(v["not_buy_count"], json!(1));
    assert_eq!(v["headlines"].as_array().unwrap().len(), 3);

    let sentiment = v["charts"]["sentiment"].as_str().unwrap();
    assert!(sentiment.starts_with("<svg"));
    assert_eq!(sentiment.matches(r#"class="buy""#).count(), 2);
    let distribution = v["charts"]["distribution"].as_str().unwrap();
    assert_eq!(distribution.matches(r#"class="bar""#).count(), 2);
}

#[tokio::test]
async fn api_analyze_defaults_threshold_and_formats_query() {
    let news = Arc::new(StubNews::with_titles(&scenario_titles()));
    let state = AppState::new(news.clone(), Arc::new(scenario_scorer()), &AppConfig::default());
    let app = router(state, Path::new("static"));

    let (st, bytes) = post_analyze(app, json!({ "api_key": "k", "ticker": "BRK.B" })).await;
    assert_eq!(st, StatusCode::OK);
    let v: Json = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["threshold"], json!(0.1));
    assert_eq!(v["query"], json!("BRK"));
    assert_eq!(v["ticker"], json!("BRK.B"));

    assert_eq!(news.calls(), vec![("k".to_string(), "BRK".to_string())]);
}

#[tokio::test]
async fn api_analyze_empty_result_is_a_warning() {
    let app = app_with(StubNews::with_titles(&[]));

    let (st, bytes) = post_analyze(app, json!({ "api_key": "k", "ticker": "ZZZZ" })).await;
    assert_eq!(st, StatusCode::OK);
    let v: Json = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["status"], json!("warning"));
    assert_eq!(v["message"], json!("No news articles found for ticker: ZZZZ"));
}

#[tokio::test]
async fn api_analyze_fetch_failure_is_an_error() {
    let app = app_with(StubNews::failing(401));

    let (st, bytes) = post_analyze(app, json!({ "api_key": "bad", "ticker": "GOOG" })).await;
    assert_eq!(st, StatusCode::BAD_GATEWAY);
    let v: Json = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["status"], json!("error"));
    assert_eq!(
        v["message"],
        json!("Failed to fetch news articles. Please check your API key and internet connection.")
    );
}

#[tokio::test]
async fn api_analyze_scoring_failure_is_a_server_error() {
    let app = app_with(StubNews::with_titles(&["headline the table does not know"]));

    let (st, bytes) = post_analyze(app, json!({ "api_key": "k", "ticker": "GOOG" })).await;
    assert_eq!(st, StatusCode::INTERNAL_SERVER_ERROR);
    let v: Json = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(v["status"], json!("error"));
}

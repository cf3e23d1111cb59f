//! Integration tests for the JSON API.

mod common;

use axum::http::{header::ACCEPT, HeaderValue};
use common::TestApp;
use listing_query::SortingType;
use marquee::services::MediaKind;

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let response = app.server().get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Marquee is running");
    assert!(body.get("version").is_some());
}

#[tokio::test]
async fn test_explore_returns_listing_json() {
    let app = TestApp::new().await;
    app.catalog().set_total_pages(10000);

    let response = app
        .server()
        .get("/api/movies/explore?sortingType=vote_average.desc&genres=28,12&page=2")
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["page"], 2);
    assert_eq!(body["total_pages"], 500);
    assert_eq!(body["query"]["sortingType"], "vote_average.desc");
    assert_eq!(body["query"]["genres"], serde_json::json!([28, 12]));
    assert_eq!(body["results"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["results"][0]["kind"], "movie");

    let (kind, params) = app.catalog().last_explore();
    assert_eq!(kind, MediaKind::Movie);
    assert_eq!(params.sorting_type, SortingType::RatingDesc);
}

#[tokio::test]
async fn test_explore_negotiates_html() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .get("/api/tv/explore")
        .add_header(ACCEPT, HeaderValue::from_static("text/html"))
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("class=\"item-grid\""));
    assert!(html.contains("Title 100"));
}

#[tokio::test]
async fn test_explore_rejects_empty_values() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/movies/explore?genres=").await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_explore_upstream_failure_maps_status() {
    let app = TestApp::new().await;
    app.catalog().fail_explore(true);

    let response = app.server().get("/api/movies/explore").await;

    response.assert_status(axum::http::StatusCode::GATEWAY_TIMEOUT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "timeout");
}

#[tokio::test]
async fn test_genres() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/tv/genres").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body[0]["id"], 28);
    assert_eq!(body[0]["name"], "Action");
}

#[tokio::test]
async fn test_trending() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/tv/trending").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body[0]["id"], 2001);
    assert_eq!(body[0]["kind"], "tv");
}

#[tokio::test]
async fn test_detail() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/movies/550").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Fight Club");
    assert_eq!(body["runtime"], 139);
}

#[tokio::test]
async fn test_detail_not_found() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/movies/404").await;

    response.assert_status_not_found();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_search() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/search?query=alien&kind=tv").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total_pages"], 4);
    assert_eq!(body["results"][0]["kind"], "tv");
}

#[tokio::test]
async fn test_search_requires_query() {
    let app = TestApp::new().await;

    app.server()
        .get("/api/search?query=")
        .await
        .assert_status_bad_request();
}

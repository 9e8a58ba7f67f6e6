use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use nearby_api::build_app;
use nearby_pipeline::ServiceConfig;
use serde_json::json;
use tower::ServiceExt;

/// Explicit config, no environment reads: no credentials configured.
fn unconfigured_app() -> axum::Router {
    build_app(ServiceConfig::default()).expect("app should build")
}

#[tokio::test]
async fn health_reports_status_and_capabilities() {
    let app = unconfigured_app();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["capabilities"]["map_search"], false);
    assert!(parsed["metrics"]["requests_total"].is_number());
}

#[tokio::test]
async fn missing_coordinates_yield_envelope_400() {
    let app = unconfigured_app();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/recommend")
        .header("content-type", "application/json")
        .body(Body::from(json!({"bizType": "yoga"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["code"], 400);
    assert!(parsed["data"].is_null());
}

#[tokio::test]
async fn valid_coordinates_without_credential_yield_envelope_500() {
    let app = unconfigured_app();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/recommend")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"lat": 39.9042, "lng": 116.4074, "bizType": "yoga"}).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["code"], 500);
    assert!(parsed["data"].is_null());
}

#[tokio::test]
async fn query_parameters_reach_the_normalizer() {
    let app = unconfigured_app();

    // String-typed coordinates from the query string coerce fine, so this
    // request gets past input validation and fails on the missing key.
    let request = Request::builder()
        .method("GET")
        .uri("/v1/recommend?lat=39.9&lng=116.4")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn body_overrides_query_parameters() {
    let app = unconfigured_app();

    // Query carries junk coordinates, the body carries none at all: the
    // body-wins merge leaves latitude unusable, so validation rejects it.
    let request = Request::builder()
        .method("POST")
        .uri("/v1/recommend?lat=39.9&lng=116.4")
        .header("content-type", "application/json")
        .body(Body::from(json!({"lat": "not-a-number"}).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

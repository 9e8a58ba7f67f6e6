use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use nearby_core::RecommendData;
use nearby_observability::AppMetrics;
use nearby_pipeline::{RecommendPipeline, ServiceConfig};
use serde::Serialize;
use serde_json::{Map, Value};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct ApiState {
    pub pipeline: Arc<RecommendPipeline>,
    pub metrics: Arc<AppMetrics>,
    generation_configured: bool,
    map_search_configured: bool,
}

/// Outbound response shape shared by every endpoint consumer. The HTTP
/// status mirrors `code`; embedders that ignore HTTP (the CLI) read `code`.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub code: u16,
    pub message: String,
    pub data: Option<RecommendData>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: nearby_observability::MetricsSnapshot,
    capabilities: HealthCapabilities,
}

#[derive(Debug, Serialize)]
struct HealthCapabilities {
    map_search: bool,
    generation: bool,
}

pub fn build_app(config: ServiceConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();
    let map_search_configured = config.map_key.is_some();
    let generation_configured = config.generation_api_key.is_some();

    let pipeline = Arc::new(RecommendPipeline::new(config, metrics.clone())?);

    let state = ApiState {
        pipeline,
        metrics,
        generation_configured,
        map_search_configured,
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/recommend", get(recommend_get).post(recommend_post))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        capabilities: HealthCapabilities {
            map_search: state.map_search_configured,
            generation: state.generation_configured,
        },
    };
    (StatusCode::OK, Json(payload))
}

async fn recommend_get(
    State(state): State<ApiState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let params = merge_params(query, None);
    run_recommend(&state, params).await
}

async fn recommend_post(
    State(state): State<ApiState>,
    Query(query): Query<HashMap<String, String>>,
    body: Option<Json<Value>>,
) -> Response {
    let params = merge_params(query, body.map(|Json(value)| value));
    run_recommend(&state, params).await
}

async fn run_recommend(state: &ApiState, params: Value) -> Response {
    match state.pipeline.recommend(&params).await {
        Ok(data) => envelope_response(200, "success".to_string(), Some(data)),
        Err(err) => {
            tracing::warn!(error = %err, "recommend request failed");
            envelope_response(err.envelope_code(), err.to_string(), None)
        }
    }
}

/// Query parameters first, body entries on top; the body wins on conflict.
fn merge_params(query: HashMap<String, String>, body: Option<Value>) -> Value {
    let mut merged = Map::new();
    for (key, value) in query {
        merged.insert(key, Value::String(value));
    }
    if let Some(Value::Object(entries)) = body {
        for (key, value) in entries {
            merged.insert(key, value);
        }
    }
    Value::Object(merged)
}

fn envelope_response(code: u16, message: String, data: Option<RecommendData>) -> Response {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(Envelope {
            code,
            message,
            data,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_overrides_query_on_merge() {
        let mut query = HashMap::new();
        query.insert("lat".to_string(), "1.0".to_string());
        query.insert("radius".to_string(), "500".to_string());

        let merged = merge_params(query, Some(json!({"lat": 39.9, "lng": 116.4})));
        assert_eq!(merged["lat"], json!(39.9));
        assert_eq!(merged["lng"], json!(116.4));
        assert_eq!(merged["radius"], json!("500"));
    }

    #[test]
    fn non_object_body_is_ignored() {
        let merged = merge_params(HashMap::new(), Some(json!(["not", "a", "map"])));
        assert_eq!(merged, json!({}));
    }
}

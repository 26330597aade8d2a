use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::pipeline::PipelineSnapshot;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineHealth {
    pub detector: &'static str,
    pub workers: usize,
    pub in_flight: usize,
    pub socket_connections: usize,
    pub target_handedness: &'static str,
    #[serde(flatten)]
    pub counters: PipelineSnapshot,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .route("/pipeline", get(pipeline_health))
}

pub async fn health_check(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "uptimeSecs": state.uptime_secs(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

pub async fn pipeline_health(State(state): State<AppState>) -> Json<PipelineHealth> {
    let pipeline = state.pipeline();
    Json(PipelineHealth {
        detector: pipeline.pool().detector_name(),
        workers: pipeline.pool().workers(),
        in_flight: pipeline.pool().in_flight(),
        socket_connections: state.socket_connections(),
        target_handedness: pipeline.classifier().target().as_str(),
        counters: pipeline.stats().snapshot(),
    })
}

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use serde::Deserialize;

use crate::extractors::JsonBody;
use crate::gesture::DetectedHand;
use crate::response::{ok, AppError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyFrameRequest {
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyLandmarksRequest {
    #[serde(default)]
    pub hands: Vec<DetectedHand>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(classify_frame))
        .route("/landmarks", post(classify_landmarks))
}

/// 单帧 HTTP 分类：与 socket `image` 事件同一流程
pub async fn classify_frame(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ClassifyFrameRequest>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.pipeline().process(&req.image).await?;
    Ok(ok(outcome))
}

pub async fn classify_landmarks(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<ClassifyLandmarksRequest>,
) -> impl IntoResponse {
    ok(state.pipeline().classify_landmarks(&req.hands))
}

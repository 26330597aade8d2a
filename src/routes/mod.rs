pub mod classify;
pub mod health;
pub mod socket;

use axum::extract::DefaultBodyLimit;
use axum::response::IntoResponse;
use axum::Router;

use crate::frame::encoded_len_limit;
use crate::middleware::request_id;
use crate::response::AppError;
use crate::state::AppState;

/// JSON envelope overhead on top of the base64-encoded frame.
const BODY_OVERHEAD: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    // base64 每 3 字节编码为 4 字节
    let body_limit =
        encoded_len_limit(state.config().limits.max_frame_bytes).saturating_add(BODY_OVERHEAD);

    let api_routes = Router::new()
        .nest("/classify", classify::router())
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .nest("/api", api_routes)
        .nest("/socket", socket::router())
        .nest("/health", health::router())
        .fallback(fallback_404)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}

async fn fallback_404() -> impl IntoResponse {
    AppError::not_found("Not found")
}

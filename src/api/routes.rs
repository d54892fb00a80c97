use crate::api::handlers::{ApiState, MESSAGES_PATH, SSE_PATH};
use axum::{
    routing::{get, post},
    Router,
};

pub fn health_routes() -> Router<ApiState> {
    Router::new()
        .route("/health", get(super::handlers::health_check))
        .route("/info", get(super::handlers::server_info))
}

pub fn mcp_routes() -> Router<ApiState> {
    Router::new()
        .route(SSE_PATH, get(super::handlers::sse_connect))
        .route(MESSAGES_PATH, post(super::handlers::post_message))
}

use crate::error::GatewayError;
use crate::session::SessionManager;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::{future, stream, Stream, StreamExt};
use rmcp::model::ClientJsonRpcMessage;
use serde::Deserialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::time::Duration;
use tracing::{info, warn};

/// Path clients POST their JSON-RPC messages to
pub const MESSAGES_PATH: &str = "/messages";
/// Path that opens the SSE stream
pub const SSE_PATH: &str = "/sse";

/// Application state shared across handlers
#[derive(Clone)]
pub struct ApiState {
    pub sessions: SessionManager,
    pub keep_alive: Duration,
}

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

pub(crate) async fn health_check(State(state): State<ApiState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "session": state.sessions.state().await.to_string(),
    }))
}

pub(crate) async fn server_info() -> impl IntoResponse {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "authors": env!("CARGO_PKG_AUTHORS"),
    }))
}

/// Open the event stream and bind a new session to it
pub(crate) async fn sse_connect(
    State(state): State<ApiState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, GatewayError> {
    let connection = state.sessions.connect().await?;
    info!(session = %connection.id(), "Received connection");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{}?sessionId={}", MESSAGES_PATH, connection.id()));

    let messages = connection.filter_map(|message| {
        future::ready(match serde_json::to_string(&message) {
            Ok(data) => Some(Ok::<_, Infallible>(
                Event::default().event("message").data(data),
            )),
            Err(e) => {
                warn!("Dropping unserializable outbound message: {}", e);
                None
            }
        })
    });

    let events = stream::once(future::ready(Ok::<_, Infallible>(endpoint))).chain(messages);

    Ok(Sse::new(events).keep_alive(KeepAlive::new().interval(state.keep_alive)))
}

/// Accept one JSON-RPC message for the bound session
pub(crate) async fn post_message(
    State(state): State<ApiState>,
    Query(query): Query<MessageQuery>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, GatewayError> {
    info!("Received message");

    let Json(payload) =
        payload.map_err(|rejection| GatewayError::invalid_request(rejection.body_text()))?;
    let message: ClientJsonRpcMessage = serde_json::from_value(payload)?;

    state
        .sessions
        .forward(query.session_id.as_deref(), message)
        .await?;

    Ok((StatusCode::ACCEPTED, "Accepted"))
}

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use futures::StreamExt;
use serde_json::{json, Value};
use slack_mcp_server::{
    api::{self, handlers::ApiState},
    config::{AppConfig, SessionConfig, SessionMode},
    slack::{SlackApi, SlackError},
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ──────────────────────────────────────────────
// Slack stand-in
// ──────────────────────────────────────────────

/// Records every upstream call; optionally fails them all with one error code.
#[derive(Clone, Default)]
pub struct RecordingSlack {
    calls: Arc<Mutex<Vec<String>>>,
    failure: Option<String>,
}

impl RecordingSlack {
    pub fn failing(code: &str) -> Self {
        Self {
            failure: Some(code.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &str, result: Value) -> Result<Value, SlackError> {
        self.calls.lock().unwrap().push(method.to_string());
        match &self.failure {
            Some(code) => Err(SlackError::Api(code.clone())),
            None => Ok(result),
        }
    }
}

#[async_trait]
impl SlackApi for RecordingSlack {
    async fn get_channels(
        &self,
        _limit: Option<u64>,
        _cursor: Option<String>,
    ) -> Result<Value, SlackError> {
        self.record(
            "conversations.list",
            json!({"ok": true, "channels": [{"id": "C1", "name": "general"}]}),
        )
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<Value, SlackError> {
        self.record(
            "chat.postMessage",
            json!({"ok": true, "channel": channel_id, "message": {"text": text}}),
        )
    }

    async fn post_reply(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<Value, SlackError> {
        self.record(
            "chat.postMessage",
            json!({"ok": true, "channel": channel_id, "message": {"thread_ts": thread_ts, "text": text}}),
        )
    }

    async fn add_reaction(
        &self,
        _channel_id: &str,
        _timestamp: &str,
        _reaction: &str,
    ) -> Result<Value, SlackError> {
        self.record("reactions.add", json!({"ok": true}))
    }

    async fn get_channel_history(
        &self,
        _channel_id: &str,
        _limit: Option<u64>,
    ) -> Result<Value, SlackError> {
        self.record(
            "conversations.history",
            json!({"ok": true, "messages": [{"text": "hello"}]}),
        )
    }

    async fn get_thread_replies(
        &self,
        _channel_id: &str,
        _thread_ts: &str,
    ) -> Result<Value, SlackError> {
        self.record("conversations.replies", json!({"ok": true, "messages": []}))
    }

    async fn get_users(
        &self,
        _limit: Option<u64>,
        _cursor: Option<String>,
    ) -> Result<Value, SlackError> {
        self.record("users.list", json!({"ok": true, "members": []}))
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<Value, SlackError> {
        self.record(
            "users.profile.get",
            json!({"ok": true, "profile": {"id": user_id, "real_name": "Ada"}}),
        )
    }
}

// ──────────────────────────────────────────────
// App builders
// ──────────────────────────────────────────────

pub fn test_config(mode: SessionMode) -> AppConfig {
    AppConfig {
        session: SessionConfig {
            mode,
            // Short interval so dropped clients are noticed quickly
            keep_alive_secs: 1,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Build a test Router (no HTTP server, uses tower::oneshot).
pub fn build_test_app(slack: RecordingSlack, mode: SessionMode) -> (Router, ApiState) {
    let state = api::build_state(&test_config(mode), Arc::new(slack));
    (api::build_router(state.clone()), state)
}

/// Serve the app on an ephemeral port, shutting down with the session manager.
pub async fn spawn_server(
    slack: RecordingSlack,
    mode: SessionMode,
) -> (String, ApiState, tokio::task::JoinHandle<()>) {
    let (app, state) = build_test_app(slack, mode);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = state.sessions.shutdown_token();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .unwrap();
    });

    (format!("http://{}", addr), state, handle)
}

/// Helper to extract JSON from a response body.
pub async fn response_json(response: axum::http::Response<axum::body::Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// ──────────────────────────────────────────────
// Minimal SSE client
// ──────────────────────────────────────────────

pub struct SseEvent {
    pub event: String,
    pub data: String,
}

pub struct SseClient {
    stream: futures::stream::BoxStream<'static, reqwest::Result<axum::body::Bytes>>,
    buffer: String,
}

impl SseClient {
    pub async fn connect(base: &str) -> Self {
        let response = reqwest::get(format!("{}/sse", base)).await.unwrap();
        assert!(response.status().is_success());
        Self {
            stream: response.bytes_stream().boxed(),
            buffer: String::new(),
        }
    }

    /// Next event carrying data; keep-alive comments are skipped.
    pub async fn next_event(&mut self) -> Option<SseEvent> {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if let Some(pos) = self.buffer.find("\n\n") {
                    let raw: String = self.buffer.drain(..pos + 2).collect();
                    let mut event = String::from("message");
                    let mut data = Vec::new();
                    for line in raw.lines() {
                        if let Some(value) = line.strip_prefix("event:") {
                            event = value.trim().to_string();
                        } else if let Some(value) = line.strip_prefix("data:") {
                            data.push(value.trim_start().to_string());
                        }
                    }
                    if data.is_empty() {
                        continue;
                    }
                    return Some(SseEvent {
                        event,
                        data: data.join("\n"),
                    });
                }

                match self.stream.next().await {
                    Some(Ok(chunk)) => self.buffer.push_str(&String::from_utf8_lossy(&chunk)),
                    _ => return None,
                }
            }
        })
        .await
        .expect("timed out waiting for SSE event")
    }

    /// Wait for the JSON-RPC response carrying `id`
    pub async fn response_for(&mut self, id: u64) -> Value {
        loop {
            let event = self.next_event().await.expect("stream closed");
            if event.event != "message" {
                continue;
            }
            let message: Value = serde_json::from_str(&event.data).unwrap();
            if message["id"] == json!(id) {
                return message;
            }
        }
    }
}

pub async fn post(base: &str, endpoint: &str, body: Value) -> reqwest::StatusCode {
    reqwest::Client::new()
        .post(format!("{}{}", base, endpoint))
        .json(&body)
        .send()
        .await
        .unwrap()
        .status()
}

/// Run the initialize handshake; returns the initialize result
pub async fn handshake(base: &str, endpoint: &str, sse: &mut SseClient) -> Value {
    let status = post(
        base,
        endpoint,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {"name": "integration-test", "version": "0.1.0"},
            },
        }),
    )
    .await;
    assert_eq!(status, reqwest::StatusCode::ACCEPTED);

    let initialized = sse.response_for(1).await;

    let status = post(
        base,
        endpoint,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    )
    .await;
    assert_eq!(status, reqwest::StatusCode::ACCEPTED);

    initialized
}

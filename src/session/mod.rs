//! Single-client session lifecycle for the SSE transport.
//!
//! A [`SessionManager`] binds each incoming stream to a fresh [`SlackBridge`]
//! served by rmcp over a pair of in-memory channels. Only one session is active
//! at a time; a new connection supersedes the current one. When the active
//! session closes the manager either returns to idle or, in serve-once mode,
//! fires the shutdown token so the HTTP server can exit.

use crate::config::{SessionConfig, SessionMode};
use crate::error::{GatewayError, Result};
use crate::mcp::SlackBridge;
use dashmap::DashMap;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{Stream, StreamExt};
use rmcp::model::{ClientJsonRpcMessage, ServerJsonRpcMessage};
use rmcp::ServiceExt;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::RwLock;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Observable lifecycle of the session slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active(String),
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Idle => "idle",
            SessionState::Active(_) => "active",
            SessionState::Terminated => "terminated",
        };
        write!(f, "{}", s)
    }
}

/// Server-side ends of a live session
struct SessionHandle {
    id: String,
    inbound: UnboundedSender<ClientJsonRpcMessage>,
    cancel: CancellationToken,
}

/// Outbound half of a session, handed to the SSE response.
///
/// Dropping it (the client went away) closes the session.
pub struct SessionConnection {
    id: String,
    messages: UnboundedReceiver<ServerJsonRpcMessage>,
    _guard: DropGuard,
}

impl SessionConnection {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Stream for SessionConnection {
    type Item = ServerJsonRpcMessage;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.messages.poll_next_unpin(cx)
    }
}

#[derive(Clone)]
pub struct SessionManager {
    bridge: SlackBridge,
    settings: SessionConfig,
    active: Arc<RwLock<Option<SessionHandle>>>,
    detached: Arc<DashMap<String, SessionHandle>>,
    shutdown: CancellationToken,
}

impl SessionManager {
    pub fn new(bridge: SlackBridge, settings: SessionConfig) -> Self {
        Self {
            bridge,
            settings,
            active: Arc::new(RwLock::new(None)),
            detached: Arc::new(DashMap::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Cancelled once the process should stop serving
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn state(&self) -> SessionState {
        if self.shutdown.is_cancelled() {
            return SessionState::Terminated;
        }
        match self.active.read().await.as_ref() {
            Some(session) => SessionState::Active(session.id.clone()),
            None => SessionState::Idle,
        }
    }

    /// Number of superseded sessions still running
    pub fn detached_count(&self) -> usize {
        self.detached.len()
    }

    /// Open a new session and make it the active one
    pub async fn connect(&self) -> Result<SessionConnection> {
        if self.shutdown.is_cancelled() {
            return Err(GatewayError::NoActiveSession);
        }

        let id = Uuid::new_v4().to_string();
        let (inbound_tx, inbound_rx) = mpsc::unbounded::<ClientJsonRpcMessage>();
        let (outbound_tx, outbound_rx) = mpsc::unbounded::<ServerJsonRpcMessage>();
        let cancel = CancellationToken::new();

        let handle = SessionHandle {
            id: id.clone(),
            inbound: inbound_tx,
            cancel: cancel.clone(),
        };

        let previous = self.active.write().await.replace(handle);
        if let Some(previous) = previous {
            self.supersede(previous);
        }

        info!(session = %id, "Session opened");
        self.spawn_service(id.clone(), outbound_tx, inbound_rx, cancel.clone());

        Ok(SessionConnection {
            id,
            messages: outbound_rx,
            _guard: cancel.drop_guard(),
        })
    }

    /// Forward a client message to the active session
    pub async fn forward(&self, session_id: Option<&str>, message: ClientJsonRpcMessage) -> Result<()> {
        let active = self.active.read().await;
        let session = active.as_ref().ok_or(GatewayError::NoActiveSession)?;

        if let Some(requested) = session_id {
            if requested != session.id {
                return Err(GatewayError::SessionNotFound(requested.to_string()));
            }
        }

        session
            .inbound
            .unbounded_send(message)
            .map_err(|_| GatewayError::SessionNotFound(session.id.clone()))
    }

    /// Close every session, active or detached
    pub async fn close_all(&self) {
        if let Some(session) = self.active.write().await.take() {
            info!(session = %session.id, "Closing active session");
            session.cancel.cancel();
        }
        self.detached.retain(|_, session| {
            session.cancel.cancel();
            false
        });
    }

    fn supersede(&self, previous: SessionHandle) {
        if self.settings.close_superseded {
            info!(session = %previous.id, "Closing superseded session");
            previous.cancel.cancel();
        } else {
            warn!(
                session = %previous.id,
                "Session superseded by a new connection, leaving it detached"
            );
            self.detached.insert(previous.id.clone(), previous);
        }
    }

    fn spawn_service(
        &self,
        id: String,
        outbound: UnboundedSender<ServerJsonRpcMessage>,
        inbound: UnboundedReceiver<ClientJsonRpcMessage>,
        cancel: CancellationToken,
    ) {
        let bridge = self.bridge.clone();
        let manager = self.clone();

        tokio::spawn(async move {
            // The handshake does not watch the token, so race it explicitly
            let served = tokio::select! {
                served = bridge.serve_with_ct((outbound, inbound), cancel.child_token()) => Some(served),
                _ = cancel.cancelled() => None,
            };

            match served {
                Some(Ok(running)) => {
                    debug!(session = %id, "MCP handshake complete");
                    match running.waiting().await {
                        Ok(reason) => debug!(session = %id, ?reason, "MCP service stopped"),
                        Err(e) => error!(session = %id, error = %e, "MCP service task failed"),
                    }
                }
                Some(Err(e)) => warn!(session = %id, error = %e, "MCP handshake failed"),
                None => debug!(session = %id, "Session cancelled before handshake"),
            }

            manager.on_session_closed(&id).await;
        });
    }

    async fn on_session_closed(&self, id: &str) {
        if self.detached.remove(id).is_some() {
            debug!(session = %id, "Detached session closed");
            return;
        }

        {
            let mut active = self.active.write().await;
            match active.as_ref() {
                Some(session) if session.id == id => {
                    *active = None;
                }
                // Superseded and already closed
                _ => return,
            }
        }

        info!(session = %id, "Session closed");

        match self.settings.mode {
            SessionMode::ServeOnce => {
                info!("Serve-once mode: shutting down after session close");
                self.shutdown.cancel();
            }
            SessionMode::ServeMany => info!("Waiting for the next connection"),
        }
    }
}

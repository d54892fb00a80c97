pub mod handlers;
pub mod routes;

use crate::config::AppConfig;
use crate::dispatch::DispatchRouter;
use crate::mcp::SlackBridge;
use crate::session::SessionManager;
use crate::slack::SlackApi;
use crate::tools;
use anyhow::Result;
use axum::Router;
use handlers::{ApiState, MESSAGES_PATH, SSE_PATH};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Wire the Slack client into a session manager for the given config
pub fn build_state(config: &AppConfig, api: Arc<dyn SlackApi>) -> ApiState {
    let router = DispatchRouter::new(api);
    let bridge = SlackBridge::new(router, tools::catalog());

    ApiState {
        sessions: SessionManager::new(bridge, config.session.clone()),
        keep_alive: Duration::from_secs(config.session.keep_alive_secs),
    }
}

pub async fn start_server(config: AppConfig, api: Arc<dyn SlackApi>) -> Result<()> {
    let addr = format!("{}:{}", config.http.host, config.http.port);

    let state = build_state(&config, api);
    let sessions = state.sessions.clone();

    // Build the application
    let app = build_router(state);

    // Create TCP listener
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server is running on port {}", config.http.port);
    info!("Health check: http://{}/health", addr);
    info!("SSE endpoint: http://{}{}", addr, SSE_PATH);
    info!("Message endpoint: http://{}{}", addr, MESSAGES_PATH);
    info!("Session mode: {}", config.session.mode);

    // Start the server
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sessions))
        .await?;

    Ok(())
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::mcp_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal(sessions: SessionManager) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let session_closed = sessions.shutdown_token();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down...");
        },
        _ = session_closed.cancelled() => {
            info!("Session closed, shutting down...");
        },
    }

    // Close any remaining streams so open connections can drain
    sessions.close_all().await;
}

//! Webhook HTTP server.
//!
//! A small axum app with two routes: `POST /webhook` receives GitHub event
//! deliveries (kind in the `X-GitHub-Event` header, JSON body) and `GET
//! /health` answers liveness probes. Processing is synchronous per event;
//! the response is the handler's plain-text acknowledgement.

use crate::error::AppError;
use crate::services::handler::Handler;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<Handler>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .with_state(state)
}

/// Bind `addr` and serve until the cancellation token fires.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    cancel: CancellationToken,
) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(format!("failed to bind {}: {}", addr, e)))?;

    log::info!("[server] listening on http://{}", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            cancel.cancelled().await;
            log::info!("[server] shutting down");
        })
        .await
        .map_err(|e| AppError::internal(format!("server error: {}", e)))
}

async fn health() -> &'static str {
    "ok"
}

/// Receive one webhook delivery and run it to completion.
async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    let Some(event_kind) = headers
        .get("x-github-event")
        .and_then(|value| value.to_str().ok())
    else {
        return (
            StatusCode::BAD_REQUEST,
            "missing X-GitHub-Event header\n".to_string(),
        );
    };

    let payload: serde_json::Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("invalid payload: {}\n", err),
            )
        }
    };

    match state.handler.run(event_kind, &payload).await {
        Ok(ack) => (StatusCode::OK, ack),
        // A repo without configuration is not an error worth redelivering.
        Err(AppError::UnsupportedRepo) => {
            log::info!("[server] ignoring event for unconfigured repository");
            (StatusCode::OK, "Repository not configured.\n".to_string())
        }
        Err(err @ (AppError::InvalidPayload { .. } | AppError::ConfigConflict { .. })) => {
            log::error!("[server] rejecting {} event: {}", event_kind, err);
            (StatusCode::BAD_REQUEST, format!("{}\n", err))
        }
        Err(err @ (AppError::GitHubApi { .. } | AppError::Network { .. })) => {
            log::error!("[server] gateway failure for {} event: {}", event_kind, err);
            (StatusCode::BAD_GATEWAY, format!("{}\n", err))
        }
        Err(err) => {
            log::error!("[server] internal error for {} event: {}", event_kind, err);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{}\n", err))
        }
    }
}

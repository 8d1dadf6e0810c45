//! HTTP endpoint receiving pushed updates and handing them to [`TelegramBot::handle_webhook_request`].
//!
//! Status mapping: 401 when the secret header does not match, 400 for bodies that are not a valid
//! update, 500 when dispatch fails, 200 otherwise.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use dbot_telegram::TelegramBot;
use serde_json::Value;
use tracing::{error, info, warn};

/// Router with a single `POST <path>` route.
pub fn router(bot: Arc<TelegramBot>, path: &str) -> Router {
    Router::new()
        .route(path, post(receive_update))
        .with_state(bot)
}

async fn receive_update(
    State(bot): State<Arc<TelegramBot>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if !bot.validate_secret_headers(&headers) {
        warn!("Webhook request rejected: secret token mismatch");
        return StatusCode::UNAUTHORIZED;
    }

    let raw: Value = match serde_json::from_slice(&body) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Webhook request rejected: body is not JSON");
            return StatusCode::BAD_REQUEST;
        }
    };

    match bot.handle_webhook_request(raw).await {
        Ok(_) => StatusCode::OK,
        Err(e) if e.is_validation() => {
            warn!(error = %e, "Webhook request rejected");
            StatusCode::BAD_REQUEST
        }
        Err(e) => {
            error!(error = %e, "Webhook dispatch failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Binds `addr` and serves the webhook route until the process is stopped.
pub async fn serve(bot: Arc<TelegramBot>, addr: &str, path: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(addr = %addr, path = %path, "Webhook server listening");
    axum::serve(listener, router(bot, path))
        .await
        .context("webhook server failed")
}

//! Bot API handle used by handlers and the update sources.
//!
//! [`BotApi`] is transport-agnostic: it wraps an `Arc<dyn Transport>` and exposes the typed methods
//! the dispatch layer needs. Production code plugs in the HTTP transport; tests substitute a mock.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{debug, instrument};

use crate::builder::MessageBuilder;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::User;

/// Cheap, cloneable handle to the Bot API.
#[derive(Clone)]
pub struct BotApi {
    transport: Arc<dyn Transport>,
}

impl BotApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Invokes any Bot API method and returns the unwrapped `result`.
    #[instrument(skip(self, payload))]
    pub async fn call_api(&self, method: &str, payload: Value) -> Result<Value> {
        debug!(method = %method, "step: calling Bot API");
        self.transport.call_api(method, payload).await
    }

    /// Long-polls for updates starting at `offset`; the platform holds the request up to
    /// `timeout_secs` when nothing is pending.
    ///
    /// Elements are returned undecoded so that one malformed update cannot fail the whole batch.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Value>> {
        let result = self
            .call_api(
                "getUpdates",
                json!({ "offset": offset, "timeout": timeout_secs }),
            )
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn get_me(&self) -> Result<User> {
        let result = self.call_api("getMe", json!({})).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Registers `url` as the webhook; `secret_token` is only sent when present.
    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<Value> {
        let mut payload = Map::new();
        payload.insert("url".to_string(), Value::String(url.to_string()));
        if let Some(secret) = secret_token {
            payload.insert("secret_token".to_string(), Value::String(secret.to_string()));
        }
        self.call_api("setWebhook", Value::Object(payload)).await
    }

    pub async fn delete_webhook(&self) -> Result<Value> {
        self.call_api("deleteWebhook", json!({})).await
    }

    /// Starts an outbound message to `chat_id`.
    pub fn message(&self, chat_id: i64) -> MessageBuilder<'_> {
        MessageBuilder::new(self, chat_id)
    }
}

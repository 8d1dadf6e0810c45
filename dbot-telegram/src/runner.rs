//! Update sources: long polling loop and webhook entry point, both feeding the same
//! [`HandlerChain`].
//!
//! One `TelegramBot` is one logical thread of control. Updates in a polled batch are dispatched one
//! after another in ascending `update_id` order; each dispatch (including everything it awaits)
//! completes before the next begins. There is no per-handler timeout, so a handler that never
//! returns stalls the polling loop.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dbot_core::{BotApi, DbotError, MessageBuilder, Result, Transport, Update};
use handler_chain::{Dispatch, HandlerChain};
use reqwest::header::HeaderMap;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::config::TelegramConfig;
use crate::transport::HttpTransport;

/// Seconds the platform may hold a `getUpdates` request open while waiting for updates.
pub const LONG_POLL_TIMEOUT_SECS: u64 = 30;

/// Header the platform uses to present the webhook secret (`X-Telegram-Bot-Api-Secret-Token`).
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Bot controller: API handle, frozen handler chain, optional webhook secret and polling state.
pub struct TelegramBot {
    api: BotApi,
    chain: Arc<HandlerChain>,
    secret_token: Option<String>,
    offset: AtomicI64,
    polling: AtomicBool,
}

impl TelegramBot {
    /// Creates a bot talking to the Bot API over HTTP.
    pub fn new(config: &TelegramConfig, chain: HandlerChain) -> Result<Self> {
        config
            .validate()
            .map_err(|e| DbotError::Config(e.to_string()))?;
        let transport = HttpTransport::new(
            config.bot_token.clone(),
            config.telegram_api_url.as_deref(),
        )?;
        Ok(Self::with_transport(
            Arc::new(transport),
            chain,
            config.webhook_secret.clone(),
        ))
    }

    /// Creates a bot over any transport (tests substitute a scripted one).
    pub fn with_transport(
        transport: Arc<dyn Transport>,
        chain: HandlerChain,
        secret_token: Option<String>,
    ) -> Self {
        Self {
            api: BotApi::new(transport),
            chain: Arc::new(chain),
            secret_token,
            offset: AtomicI64::new(0),
            polling: AtomicBool::new(false),
        }
    }

    pub fn api(&self) -> &BotApi {
        &self.api
    }

    /// Starts an outbound message to `chat_id`.
    pub fn message(&self, chat_id: i64) -> MessageBuilder<'_> {
        self.api.message(chat_id)
    }

    /// Next `update_id` the polling loop will request.
    pub fn offset(&self) -> i64 {
        self.offset.load(Ordering::SeqCst)
    }

    pub fn is_polling(&self) -> bool {
        self.polling.load(Ordering::SeqCst)
    }

    /// Polls until [`stop_polling`](Self::stop_polling) is called, sleeping `interval` after every
    /// cycle. A failed cycle is logged and the loop carries on.
    ///
    /// Run at most one poller per instance; two concurrent calls would fetch and dispatch the same
    /// updates twice.
    #[instrument(skip(self))]
    pub async fn start_polling(&self, interval: Duration) {
        self.polling.store(true, Ordering::SeqCst);
        info!(offset = self.offset(), "Polling started");

        while self.polling.load(Ordering::SeqCst) {
            match self.poll_once().await {
                Ok(count) => {
                    if count > 0 {
                        debug!(count = count, offset = self.offset(), "Batch dispatched");
                    }
                }
                Err(e) => {
                    error!(error = %e, offset = self.offset(), "Polling error");
                }
            }
            tokio::time::sleep(interval).await;
        }

        info!(offset = self.offset(), "Polling stopped");
    }

    /// Asks the loop to exit before its next fetch. Does not interrupt a batch in progress.
    pub fn stop_polling(&self) {
        self.polling.store(false, Ordering::SeqCst);
    }

    /// One polling cycle: fetch a batch at the current offset and dispatch it in order.
    ///
    /// The offset moves past each update before that update is dispatched. An element that does
    /// not decode is logged and skipped; the offset still moves past it. If a dispatch fails, the
    /// rest of the batch is left for the next fetch and the error is returned. Returns the number
    /// of updates dispatched.
    pub async fn poll_once(&self) -> Result<usize> {
        let offset = self.offset();
        let batch = self
            .api
            .get_updates(offset, LONG_POLL_TIMEOUT_SECS)
            .await?;

        let mut updates = Vec::with_capacity(batch.len());
        for raw in batch {
            match raw.get("update_id").and_then(Value::as_i64) {
                Some(update_id) => updates.push((update_id, raw)),
                None => warn!(offset = offset, "Skipping batch element without an integer update_id"),
            }
        }
        updates.sort_by_key(|(update_id, _)| *update_id);

        let mut dispatched = 0;
        for (update_id, raw) in updates {
            self.advance_offset(update_id + 1);
            let update = match decode_update(raw) {
                Ok(update) => update,
                Err(e) => {
                    warn!(update_id = update_id, error = %e, "Skipping update that failed to decode");
                    continue;
                }
            };
            self.dispatch(update).await?;
            dispatched += 1;
        }
        Ok(dispatched)
    }

    /// Entry point for one pushed webhook body. Checks the shape, then dispatches exactly like
    /// polling without touching the offset. Dispatch errors are returned to the caller.
    ///
    /// The secret is not checked here; call [`validate_secret_token`](Self::validate_secret_token)
    /// or [`validate_secret_headers`](Self::validate_secret_headers) first. Concurrent calls are not
    /// serialized.
    pub async fn handle_webhook_request(&self, raw: Value) -> Result<Dispatch> {
        if !raw.get("update_id").is_some_and(Value::is_i64) {
            warn!("Webhook body rejected: no integer update_id");
            return Err(DbotError::Validation(
                "webhook body must be an object with an integer update_id".to_string(),
            ));
        }
        let update = decode_update(raw)?;
        self.dispatch(update).await
    }

    /// True when no secret is configured, otherwise only for an exact match.
    pub fn validate_secret_token(&self, presented: Option<&str>) -> bool {
        match &self.secret_token {
            None => true,
            Some(secret) => presented == Some(secret.as_str()),
        }
    }

    /// Reads the secret from the `X-Telegram-Bot-Api-Secret-Token` header and validates it.
    pub fn validate_secret_headers(&self, headers: &HeaderMap) -> bool {
        let presented = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        self.validate_secret_token(presented)
    }

    /// Registers the webhook, forwarding the configured secret so the platform presents it on
    /// every push.
    pub async fn set_webhook(&self, url: &str) -> Result<Value> {
        info!(url = %url, with_secret = self.secret_token.is_some(), "Setting webhook");
        self.api.set_webhook(url, self.secret_token.as_deref()).await
    }

    pub async fn delete_webhook(&self) -> Result<Value> {
        info!("Deleting webhook");
        self.api.delete_webhook().await
    }

    fn advance_offset(&self, next: i64) {
        self.offset.fetch_max(next, Ordering::SeqCst);
    }

    async fn dispatch(&self, update: Update) -> Result<Dispatch> {
        let update_id = update.update_id;
        let chat_id = update.chat_id();
        info!(
            update_id = update_id,
            chat_id = ?chat_id,
            "step: processing update (handler chain started)"
        );
        let dispatch = self.chain.handle(update, self.api.clone()).await?;
        debug!(update_id = update_id, dispatch = ?dispatch, "step: update processed");
        Ok(dispatch)
    }
}

fn decode_update(raw: Value) -> Result<Update> {
    serde_json::from_value(raw).map_err(|e| DbotError::Validation(format!("malformed update: {}", e)))
}

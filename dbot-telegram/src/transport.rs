//! reqwest-based [`Transport`]: POSTs JSON to `{api_url}/bot{token}/{method}` and unwraps the
//! Bot API envelope.

use std::time::Duration;

use async_trait::async_trait;
use dbot_core::{ApiResponse, DbotError, Result, Transport};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Must exceed the long-poll timeout so `getUpdates` is not cut off client-side.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Masks a bot token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the token.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_char_boundary(7) || !token.is_char_boundary(len - 4) {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpTransport {
    /// Builds a transport for `token`; `api_url` overrides the public Bot API endpoint (local Bot
    /// API server, test server).
    pub fn new(token: impl Into<String>, api_url: Option<&str>) -> Result<Self> {
        let token = token.into();
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DbotError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        let base_url = api_url
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();

        info!(api_url = %base_url, token = %mask_token(&token), "HTTP transport created");

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, payload))]
    async fn call_api(&self, method: &str, payload: Value) -> Result<Value> {
        // reqwest errors carry the request URL, which contains the token.
        let response = self
            .client
            .post(self.method_url(method))
            .json(&payload)
            .send()
            .await
            .map_err(|e| DbotError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let envelope: ApiResponse = response.json().await.map_err(|e| {
            DbotError::Transport(format!(
                "Invalid response body (HTTP {}): {}",
                status,
                e.without_url()
            ))
        })?;

        debug!(method = %method, status = %status, ok = envelope.ok, "Bot API response");
        envelope.into_result()
    }
}

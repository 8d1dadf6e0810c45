//! Transport abstraction: the single remote-call primitive behind polling and every outbound send.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{DbotError, Result};

/// Performs one Bot API call. Implementations serialize `payload` as the request body, send it to
/// `{base}/{method}` and unwrap the response envelope (see [`ApiResponse::into_result`]).
///
/// Network failures map to [`DbotError::Transport`]; `ok: false` maps to [`DbotError::RemoteApi`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call_api(&self, method: &str, payload: Value) -> Result<Value>;
}

/// Response envelope returned by every Bot API method.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
}

impl ApiResponse {
    /// Unwraps `result` on success; otherwise returns `RemoteApi` with the platform description.
    pub fn into_result(self) -> Result<Value> {
        if self.ok {
            Ok(self.result.unwrap_or(Value::Null))
        } else {
            Err(DbotError::RemoteApi {
                description: self
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
                error_code: self.error_code,
            })
        }
    }
}

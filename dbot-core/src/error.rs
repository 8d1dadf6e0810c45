//! Error types for the bot core.
//!
//! [`DbotError`] is the top-level error; [`HandlerError`] is used for handler failures.

use thiserror::Error;

/// Top-level error for dbot.
///
/// `Transport` means the remote endpoint could not be reached (or its body could not be read) and is
/// a candidate for caller-level retry. `RemoteApi` means the platform answered with `ok: false`.
/// `Validation` is a local precondition failure raised before any network call.
#[derive(Error, Debug)]
pub enum DbotError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Telegram API error: {description}")]
    RemoteApi {
        description: String,
        error_code: Option<i64>,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl DbotError {
    /// True for network-level failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, DbotError::Transport(_))
    }

    /// True when the platform was reached but reported failure.
    pub fn is_remote_api(&self) -> bool {
        matches!(self, DbotError::RemoteApi { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DbotError::Validation(_))
    }
}

/// Errors produced by command handlers and middleware.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("State error: {0}")]
    State(String),
}

/// Result type for core operations; uses [`DbotError`].
pub type Result<T> = std::result::Result<T, DbotError>;

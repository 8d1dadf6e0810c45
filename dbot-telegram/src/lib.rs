//! # dbot-telegram
//!
//! Telegram connectivity: [`HttpTransport`] (reqwest) behind the [`dbot_core::Transport`] seam,
//! minimal env config, and the [`TelegramBot`] controller with long polling, the webhook entry
//! point and secret validation. Dispatch itself is delegated to [`handler_chain::HandlerChain`].

mod config;
mod runner;
mod transport;

pub use config::{TelegramConfig, DEFAULT_POLL_INTERVAL_MS};
pub use runner::{TelegramBot, LONG_POLL_TIMEOUT_SECS, SECRET_TOKEN_HEADER};
pub use transport::{mask_token, HttpTransport, DEFAULT_API_URL};

//! # dbot-core
//!
//! Core types and traits for the Telegram bot client: wire types ([`Update`], [`Message`],
//! [`CallbackQuery`]), the per-update [`Context`], [`CommandHandler`] / [`Middleware`] traits,
//! the [`Transport`] seam and the [`BotApi`] handle with its outbound [`MessageBuilder`].
//! Transport-agnostic; used by handler-chain and dbot-telegram.

pub mod bot;
pub mod builder;
pub mod context;
pub mod error;
pub mod handler;
pub mod logger;
pub mod transport;
pub mod types;

pub use bot::BotApi;
pub use builder::{MessageBuilder, PARSE_MODE};
pub use context::Context;
pub use error::{DbotError, HandlerError, Result};
pub use handler::{CommandHandler, Middleware, Next};
pub use logger::init_tracing;
pub use transport::{ApiResponse, Transport};
pub use types::{CallbackQuery, Chat, ChatType, InlineKeyboardButton, Message, Update, User};

//! # dbot-cli
//!
//! Argument parsing, the demo echo chain and the axum webhook endpoint used by the `dbot` binary.

pub mod cli;
pub mod echo;
pub mod webhook;

pub use cli::{load_config, Cli, Commands};
pub use echo::{build_chain, escape_html, EchoMiddleware, HelpCommand, StartCommand};
pub use webhook::{router, serve};

//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dbot_telegram::TelegramConfig;

#[derive(Parser, Debug)]
#[command(name = "dbot")]
#[command(about = "Telegram Bot CLI: run, webhook, set-webhook, delete-webhook", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Only these user ids may reach the echo middleware (comma separated). Empty allows everyone.
    #[arg(long, global = true, value_delimiter = ',')]
    pub allow: Vec<i64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Run the bot with long polling (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
        /// Pause between polling cycles; overrides POLL_INTERVAL_MS.
        #[arg(long)]
        interval_ms: Option<u64>,
    },
    /// Serve the webhook endpoint; with --url the webhook is registered first.
    Webhook {
        #[arg(short, long)]
        token: Option<String>,
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,
        #[arg(long, default_value = "/webhook")]
        path: String,
        #[arg(long)]
        url: Option<String>,
    },
    /// Register a webhook URL, forwarding WEBHOOK_SECRET when set.
    SetWebhook { url: String },
    /// Remove the webhook so long polling can be used again.
    DeleteWebhook,
}

/// Load TelegramConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<TelegramConfig> {
    TelegramConfig::load(token)
}

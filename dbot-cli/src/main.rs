//! dbot CLI: run the demo bot by long polling or behind a webhook, manage webhook registration.
//! Config from env (BOT_TOKEN, TELEGRAM_API_URL, WEBHOOK_SECRET, POLL_INTERVAL_MS, LOG_FILE) and
//! optional CLI args.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use dbot_cli::{build_chain, load_config, serve, Cli, Commands};
use dbot_core::init_tracing;
use dbot_telegram::{TelegramBot, TelegramConfig};
use handler_chain::HandlerChain;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token, interval_ms } => {
            let config = load_config(token)?;
            init_tracing(config.log_file.as_deref())?;
            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.poll_interval());
            let bot = Arc::new(create_bot(&config, cli.allow).await?);

            let stopper = bot.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Ctrl-C received, stopping after the current cycle");
                    stopper.stop_polling();
                }
            });

            bot.start_polling(interval).await;
            Ok(())
        }
        Commands::Webhook {
            token,
            listen,
            path,
            url,
        } => {
            let config = load_config(token)?;
            init_tracing(config.log_file.as_deref())?;
            let bot = Arc::new(create_bot(&config, cli.allow).await?);
            if let Some(url) = url {
                bot.set_webhook(&url).await?;
            }
            serve(bot, &listen, &path).await
        }
        Commands::SetWebhook { url } => {
            let config = load_config(None)?;
            init_tracing(config.log_file.as_deref())?;
            let bot = TelegramBot::new(&config, HandlerChain::new())?;
            bot.set_webhook(&url).await?;
            info!(url = %url, "Webhook set");
            Ok(())
        }
        Commands::DeleteWebhook => {
            let config = load_config(None)?;
            init_tracing(config.log_file.as_deref())?;
            let bot = TelegramBot::new(&config, HandlerChain::new())?;
            bot.delete_webhook().await?;
            info!("Webhook deleted");
            Ok(())
        }
    }
}

/// Creates the bot with the demo chain and logs who it is. A failing getMe is only a warning.
async fn create_bot(config: &TelegramConfig, allowed_users: Vec<i64>) -> Result<TelegramBot> {
    let bot = TelegramBot::new(config, build_chain(allowed_users))?;
    match bot.api().get_me().await {
        Ok(me) => info!(
            bot_id = me.id,
            username = ?me.username,
            "Bot identity confirmed"
        ),
        Err(e) => warn!(error = %e, "getMe failed; continuing"),
    }
    Ok(bot)
}

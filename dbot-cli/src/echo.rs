//! Demo chain: `/start` and `/help` commands plus an echo middleware at the end of the chain.

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{CommandHandler, Context, InlineKeyboardButton, Middleware, Next, Result};
use handler_chain::HandlerChain;
use middleware::{AuthMiddleware, LoggingMiddleware};
use tracing::{debug, info, instrument};

const HELP_TEXT: &str = "<b>Commands</b>\n/start - greeting\n/help - this text\n\nAnything else is echoed back.";

/// Escapes the characters HTML parse mode treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Greets the sender (or the name given as payload) and offers two buttons.
pub struct StartCommand;

#[async_trait]
impl CommandHandler for StartCommand {
    #[instrument(skip(self, ctx))]
    async fn handle(&self, ctx: &mut Context) -> Result<()> {
        let Some(chat_id) = ctx.chat_id() else {
            return Ok(());
        };
        let name = match ctx.payload.as_deref().filter(|p| !p.is_empty()) {
            Some(payload) => payload.to_string(),
            None => ctx
                .message
                .as_ref()
                .and_then(|m| m.from.as_ref())
                .map(|u| u.first_name.clone())
                .unwrap_or_else(|| "there".to_string()),
        };
        info!(chat_id = chat_id, "step: /start greeting");
        ctx.bot
            .message(chat_id)
            .text(format!("Hello, <b>{}</b>!", escape_html(&name)))
            .buttons(vec![vec![
                InlineKeyboardButton::new("Ping", "ping"),
                InlineKeyboardButton::new("Help", "help"),
            ]])
            .send()
            .await?;
        Ok(())
    }
}

pub struct HelpCommand;

#[async_trait]
impl CommandHandler for HelpCommand {
    async fn handle(&self, ctx: &mut Context) -> Result<()> {
        if let Some(chat_id) = ctx.chat_id() {
            ctx.bot.message(chat_id).text(HELP_TEXT).send().await?;
        }
        Ok(())
    }
}

/// Last link of the demo chain: echoes text messages and answers button presses.
pub struct EchoMiddleware;

#[async_trait]
impl Middleware for EchoMiddleware {
    #[instrument(skip(self, ctx, next))]
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> Result<()> {
        let Some(chat_id) = ctx.chat_id() else {
            return next.run(ctx).await;
        };

        let reply = if let Some(data) = ctx.callback_query.as_ref().and_then(|cb| cb.data.as_deref()) {
            match data {
                "ping" => "pong".to_string(),
                "help" => HELP_TEXT.to_string(),
                other => format!("You pressed <code>{}</code>", escape_html(other)),
            }
        } else if let Some(command) = ctx.command.as_deref() {
            format!("Unknown command <code>{}</code>, try /help", escape_html(command))
        } else if let Some(text) = ctx.text() {
            escape_html(text)
        } else {
            debug!(update_id = ctx.update.update_id, "Nothing to echo");
            return next.run(ctx).await;
        };

        ctx.bot.message(chat_id).text(reply).send().await?;
        next.run(ctx).await
    }
}

/// Builds the demo chain. A non-empty `allowed_users` puts an [`AuthMiddleware`] in front of the
/// echo; commands are not affected by it.
pub fn build_chain(allowed_users: Vec<i64>) -> HandlerChain {
    let mut chain = HandlerChain::new()
        .on_update(|update| debug!(update_id = update.update_id, "Update received"))
        .add_command("/start", Arc::new(StartCommand))
        .add_command("/help", Arc::new(HelpCommand))
        .add_middleware(Arc::new(LoggingMiddleware));
    if !allowed_users.is_empty() {
        chain = chain.add_middleware(Arc::new(AuthMiddleware::new(allowed_users)));
    }
    chain.add_middleware(Arc::new(EchoMiddleware))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_html("plain"), "plain");
    }

    /// **Test: The allowlist adds one middleware; commands are always registered.**
    #[test]
    fn test_build_chain() {
        let open = build_chain(Vec::new());
        assert!(open.has_command("/start"));
        assert!(open.has_command("/help"));
        assert_eq!(open.middleware_len(), 2);

        let restricted = build_chain(vec![1]);
        assert_eq!(restricted.middleware_len(), 3);
    }
}

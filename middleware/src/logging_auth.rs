//! Middleware for logging and optional auth (allowlist).

use async_trait::async_trait;
use dbot_core::{Context, Middleware, Next, Result};
use tracing::{debug, error, info, instrument};

/// Logs each update in front of the rest of the chain; always continues.
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    #[instrument(skip(self, ctx, next))]
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> Result<()> {
        info!(
            update_id = ctx.update.update_id,
            user_id = ?ctx.user_id(),
            chat_id = ?ctx.chat_id(),
            message_content = %ctx.text().unwrap_or(""),
            sent_at = ?ctx.message.as_ref().and_then(|m| m.sent_at()),
            callback_data = ?ctx.callback_query.as_ref().and_then(|cb| cb.data.as_deref()),
            "Received update"
        );
        next.run(ctx).await?;
        debug!(update_id = ctx.update.update_id, "Processed update");
        Ok(())
    }
}

/// Halts the chain unless the sender's user id is in the allowlist.
pub struct AuthMiddleware {
    allowed_users: Vec<i64>,
}

impl AuthMiddleware {
    /// Creates a middleware that lets only the given user ids through.
    pub fn new(allowed_users: Vec<i64>) -> Self {
        Self { allowed_users }
    }

    pub fn is_allowed(&self, user_id: i64) -> bool {
        self.allowed_users.contains(&user_id)
    }
}

#[async_trait]
impl Middleware for AuthMiddleware {
    #[instrument(skip(self, ctx, next))]
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> Result<()> {
        match ctx.user_id() {
            Some(user_id) if self.is_allowed(user_id) => {
                info!(user_id = user_id, "User authorized");
                next.run(ctx).await
            }
            user_id => {
                error!(user_id = ?user_id, "Unauthorized access attempt");
                Ok(())
            }
        }
    }
}

//! # Handler chain
//!
//! Dispatches one [`Update`] at a time. Per-event hooks fire first (each at most once, regardless
//! of what follows); then a message whose text is a command is routed to the matching command
//! handler, which ends dispatch. Everything else threads through the middleware chain in
//! registration order; a middleware that does not call `next` halts it.

mod command;

pub use command::{parse_command, ParsedCommand};

use std::collections::HashMap;
use std::sync::Arc;

use dbot_core::{
    BotApi, CallbackQuery, CommandHandler, Context, Message, Middleware, Next, Result, Update,
};
use tracing::{debug, info, instrument};

pub type UpdateHook = Arc<dyn Fn(&Update) + Send + Sync>;
pub type MessageHook = Arc<dyn Fn(&Message) + Send + Sync>;
pub type CallbackQueryHook = Arc<dyn Fn(&CallbackQuery) + Send + Sync>;

/// How an update was routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A command handler matched and ran; the middleware chain was skipped.
    Command(String),
    /// The update went through the middleware chain.
    Chain,
}

/// Hooks, command table and middleware. Built once with the consuming `add_*` / `on_*` methods,
/// then shared read-only while updates are dispatched.
#[derive(Clone, Default)]
pub struct HandlerChain {
    on_update: Option<UpdateHook>,
    on_message: Option<MessageHook>,
    on_callback_query: Option<CallbackQueryHook>,
    commands: HashMap<String, Arc<dyn CommandHandler>>,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl HandlerChain {
    /// Creates an empty chain (no hooks, commands or middleware).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hook called with every update. Replaces any previous one.
    pub fn on_update<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Update) + Send + Sync + 'static,
    {
        self.on_update = Some(Arc::new(hook));
        self
    }

    /// Sets the hook called for updates carrying a message.
    pub fn on_message<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        self.on_message = Some(Arc::new(hook));
        self
    }

    /// Sets the hook called for updates carrying a callback query.
    pub fn on_callback_query<F>(mut self, hook: F) -> Self
    where
        F: Fn(&CallbackQuery) + Send + Sync + 'static,
    {
        self.on_callback_query = Some(Arc::new(hook));
        self
    }

    /// Registers the handler for an exact command token such as `/start`. A later registration of
    /// the same token overwrites the earlier one.
    pub fn add_command(mut self, command: impl Into<String>, handler: Arc<dyn CommandHandler>) -> Self {
        self.commands.insert(command.into(), handler);
        self
    }

    /// Appends a middleware; execution order is registration order.
    pub fn add_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    pub fn has_command(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }

    pub fn middleware_len(&self) -> usize {
        self.middleware.len()
    }

    /// Dispatches one update. Errors from a command handler or middleware are returned as-is.
    #[instrument(skip(self, update, bot), fields(update_id = update.update_id))]
    pub async fn handle(&self, update: Update, bot: BotApi) -> Result<Dispatch> {
        self.fire_hooks(&update);

        let mut ctx = Context::new(update, bot);

        if let Some(parsed) = ctx.text().and_then(parse_command) {
            ctx.command = Some(parsed.command);
            ctx.payload = Some(parsed.payload);
        }

        if let Some(command) = ctx.command.clone() {
            if let Some(handler) = self.commands.get(&command) {
                info!(
                    update_id = ctx.update.update_id,
                    chat_id = ?ctx.chat_id(),
                    command = %command,
                    "step: command matched"
                );
                handler.handle(&mut ctx).await?;
                return Ok(Dispatch::Command(command));
            }
            debug!(command = %command, "No handler registered for command");
        }

        debug!(
            update_id = ctx.update.update_id,
            middleware = self.middleware.len(),
            "step: middleware chain started"
        );
        Next::new(&self.middleware).run(&mut ctx).await?;
        debug!(update_id = ctx.update.update_id, "step: middleware chain finished");

        Ok(Dispatch::Chain)
    }

    fn fire_hooks(&self, update: &Update) {
        if let Some(hook) = &self.on_update {
            hook(update);
        }
        if let (Some(hook), Some(message)) = (&self.on_message, &update.message) {
            hook(message);
        }
        if let (Some(hook), Some(cb)) = (&self.on_callback_query, &update.callback_query) {
            hook(cb);
        }
    }
}

// Integration tests live in tests/handler_chain_test.rs

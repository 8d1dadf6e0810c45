//! Handler traits: command handlers and chain middleware with an explicit continuation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::Result;

/// Exclusive handler for one literal command token. When it matches, no middleware runs.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &mut Context) -> Result<()>;
}

/// One link of the middleware chain. Call `next.run(ctx)` to pass control forward; returning
/// without calling it halts the chain for this update.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, ctx: &mut Context, next: Next<'_>) -> Result<()>;
}

/// Continuation over the middleware that have not run yet. Consumed by `run`, so a middleware can
/// pass control forward at most once.
pub struct Next<'a> {
    remaining: &'a [Arc<dyn Middleware>],
}

impl<'a> Next<'a> {
    pub fn new(remaining: &'a [Arc<dyn Middleware>]) -> Self {
        Self { remaining }
    }

    pub async fn run(self, ctx: &mut Context) -> Result<()> {
        match self.remaining.split_first() {
            Some((current, rest)) => current.handle(ctx, Next::new(rest)).await,
            None => Ok(()),
        }
    }
}

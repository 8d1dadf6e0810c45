//! # middleware
//!
//! Ready-made [`dbot_core::Middleware`] implementations: [`LoggingMiddleware`] logs every update that
//! reaches the chain, [`AuthMiddleware`] stops the chain for senders outside an allowlist.

mod logging_auth;

#[cfg(test)]
mod test;

pub use logging_auth::{AuthMiddleware, LoggingMiddleware};

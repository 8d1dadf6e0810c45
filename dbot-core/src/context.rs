//! Per-update dispatch context.

use std::collections::HashMap;

use serde_json::Value;

use crate::bot::BotApi;
use crate::types::{CallbackQuery, Message, Update};

/// Built fresh for every update and owned by the dispatch call that created it.
///
/// `command` and `payload` are only set when the message text began with `/`. Middleware can attach
/// values with [`Context::insert`] for middleware further down the same chain.
pub struct Context {
    pub update: Update,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
    pub bot: BotApi,
    pub command: Option<String>,
    pub payload: Option<String>,
    data: HashMap<String, Value>,
}

impl Context {
    pub fn new(update: Update, bot: BotApi) -> Self {
        let message = update.message.clone();
        let callback_query = update.callback_query.clone();
        Self {
            update,
            message,
            callback_query,
            bot,
            command: None,
            payload: None,
            data: HashMap::new(),
        }
    }

    /// Chat of the message, or of the message a callback query came from.
    pub fn chat_id(&self) -> Option<i64> {
        self.update.chat_id()
    }

    pub fn text(&self) -> Option<&str> {
        self.message.as_ref().and_then(|m| m.text.as_deref())
    }

    /// Sender id from either the message or the callback query.
    pub fn user_id(&self) -> Option<i64> {
        self.message
            .as_ref()
            .and_then(|m| m.from.as_ref())
            .or_else(|| self.callback_query.as_ref().and_then(|cb| cb.from.as_ref()))
            .map(|u| u.id)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::test_support::RecordingTransport;
    use serde_json::json;

    fn bot() -> BotApi {
        BotApi::new(RecordingTransport::new(Value::Null))
    }

    /// **Test: Context denormalizes the message and exposes chat, sender and text.**
    #[test]
    fn test_context_from_message_update() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 1,
            "message": {
                "message_id": 2,
                "date": 0,
                "chat": {"id": 456, "type": "group", "title": "g"},
                "from": {"id": 123, "is_bot": false, "first_name": "T"},
                "text": "hello"
            }
        }))
        .unwrap();

        let ctx = Context::new(update, bot());
        assert_eq!(ctx.chat_id(), Some(456));
        assert_eq!(ctx.user_id(), Some(123));
        assert_eq!(ctx.text(), Some("hello"));
        assert!(ctx.callback_query.is_none());
        assert!(ctx.command.is_none());
    }

    /// **Test: Callback query contexts resolve chat through the originating message.**
    #[test]
    fn test_context_from_callback_query() {
        let update: Update = serde_json::from_value(json!({
            "update_id": 1,
            "callback_query": {
                "id": "q",
                "from": {"id": 9, "is_bot": false, "first_name": "T"},
                "message": {"message_id": 2, "date": 0, "chat": {"id": 77, "type": "private"}},
                "data": "ok"
            }
        }))
        .unwrap();

        let mut ctx = Context::new(update, bot());
        assert_eq!(ctx.chat_id(), Some(77));
        assert_eq!(ctx.user_id(), Some(9));
        assert!(ctx.text().is_none());

        ctx.insert("seen", json!(true));
        assert_eq!(ctx.get("seen"), Some(&json!(true)));
        assert!(ctx.get("missing").is_none());
    }
}

//! Fluent construction of outbound `sendMessage` calls.

use serde_json::{json, Value};
use tracing::instrument;

use crate::bot::BotApi;
use crate::error::{DbotError, Result};
use crate::types::{InlineKeyboardButton, Message};

/// Rendering mode applied to every outbound text.
pub const PARSE_MODE: &str = "HTML";

/// Builder returned by [`BotApi::message`].
pub struct MessageBuilder<'a> {
    api: &'a BotApi,
    chat_id: i64,
    text: Option<String>,
    buttons: Vec<Vec<InlineKeyboardButton>>,
}

impl<'a> MessageBuilder<'a> {
    pub(crate) fn new(api: &'a BotApi, chat_id: i64) -> Self {
        Self {
            api,
            chat_id,
            text: None,
            buttons: Vec::new(),
        }
    }

    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.text = Some(content.into());
        self
    }

    /// Replaces the inline keyboard with `rows`.
    pub fn buttons(mut self, rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        self.buttons = rows;
        self
    }

    /// Composes the `sendMessage` payload. Fails with `Validation` when no (or empty) text was set.
    pub fn build_payload(&self) -> Result<Value> {
        let text = match self.text.as_deref() {
            Some(text) if !text.is_empty() => text,
            _ => {
                return Err(DbotError::Validation(
                    "Cannot send a message without text".to_string(),
                ))
            }
        };

        let mut payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": PARSE_MODE,
        });
        if !self.buttons.is_empty() {
            payload["reply_markup"] = json!({ "inline_keyboard": self.buttons });
        }
        Ok(payload)
    }

    /// Validates, then sends via `sendMessage` and decodes the sent message.
    #[instrument(skip(self), fields(chat_id = self.chat_id))]
    pub async fn send(self) -> Result<Message> {
        let payload = self.build_payload()?;
        let result = self.api.call_api("sendMessage", payload).await?;
        Ok(serde_json::from_value(result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::test_support::RecordingTransport;

    fn sent_message() -> Value {
        json!({
            "message_id": 1,
            "date": 1706529600,
            "chat": {"id": 42, "type": "private"},
            "text": "Hello"
        })
    }

    /// **Test: text-only send produces a payload without a keyboard block.**
    #[tokio::test]
    async fn test_send_text_without_buttons() {
        let transport = RecordingTransport::new(sent_message());
        let api = BotApi::new(transport.clone());

        let sent = api.message(42).text("Hello").send().await.unwrap();

        assert_eq!(sent.message_id, 1);
        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "sendMessage");
        assert_eq!(
            calls[0].1,
            json!({"chat_id": 42, "text": "Hello", "parse_mode": "HTML"})
        );
        assert!(calls[0].1.get("reply_markup").is_none());
    }

    /// **Test: one button row becomes one inline_keyboard row.**
    #[tokio::test]
    async fn test_send_with_one_button_row() {
        let transport = RecordingTransport::new(sent_message());
        let api = BotApi::new(transport.clone());

        api.message(42)
            .text("Hi")
            .buttons(vec![vec![InlineKeyboardButton::new("OK", "ok")]])
            .send()
            .await
            .unwrap();

        let calls = transport.calls.lock().unwrap();
        assert_eq!(
            calls[0].1["reply_markup"],
            json!({"inline_keyboard": [[{"text": "OK", "callback_data": "ok"}]]})
        );
    }

    /// **Test: send without text fails with Validation and never reaches the transport.**
    #[tokio::test]
    async fn test_send_without_text_fails_before_transport() {
        let transport = RecordingTransport::new(sent_message());
        let api = BotApi::new(transport.clone());

        let err = api.message(42).send().await.unwrap_err();
        assert!(err.is_validation());

        let err = api.message(42).text("").send().await.unwrap_err();
        assert!(err.is_validation());

        assert!(transport.calls.lock().unwrap().is_empty());
    }

    /// **Test: an empty rows vector leaves the keyboard out.**
    #[test]
    fn test_empty_buttons_omit_keyboard() {
        let transport = RecordingTransport::new(Value::Null);
        let api = BotApi::new(transport);
        let payload = api
            .message(1)
            .text("x")
            .buttons(Vec::new())
            .build_payload()
            .unwrap();
        assert!(payload.get("reply_markup").is_none());
    }
}

//! Scripted transport shared by the dbot-telegram integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dbot_core::{DbotError, Result, Transport};
use serde_json::{json, Value};

/// Answers calls from a queue of scripted results and records every (method, payload).
/// Once the queue is empty, `getUpdates` returns an empty batch and other methods return `true`.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_ok(&self, value: Value) {
        self.responses.lock().unwrap().push_back(Ok(value));
    }

    pub fn push_transport_error(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(DbotError::Transport(message.to_string())));
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    /// Offsets sent with each `getUpdates` call, in order.
    pub fn polled_offsets(&self) -> Vec<i64> {
        self.calls()
            .into_iter()
            .filter(|(method, _)| method == "getUpdates")
            .filter_map(|(_, payload)| payload["offset"].as_i64())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn call_api(&self, method: &str, payload: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), payload));
        match self.responses.lock().unwrap().pop_front() {
            Some(result) => result,
            None if method == "getUpdates" => Ok(json!([])),
            None => Ok(json!(true)),
        }
    }
}

pub fn text_update(update_id: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1706529600,
            "chat": {"id": 456, "type": "private"},
            "from": {"id": 123, "is_bot": false, "first_name": "Test"},
            "text": text
        }
    })
}

use super::{SlackApi, SlackError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// In-memory stand-in that records every call
#[derive(Clone, Default)]
pub(crate) struct FakeSlack {
    calls: Arc<Mutex<Vec<(&'static str, Value)>>>,
    failure: Option<String>,
}

impl FakeSlack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every call fails with the given Slack error code
    pub(crate) fn failing(code: &str) -> Self {
        Self {
            failure: Some(code.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<(&'static str, Value)> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: &'static str, args: Value) -> Result<Value, SlackError> {
        let mut calls = self.calls.lock().unwrap();
        calls.push((method, args.clone()));
        if let Some(code) = &self.failure {
            return Err(SlackError::Api(code.clone()));
        }
        Ok(json!({"ok": true, "method": method, "args": args, "seq": calls.len()}))
    }
}

#[async_trait]
impl SlackApi for FakeSlack {
    async fn get_channels(
        &self,
        limit: Option<u64>,
        cursor: Option<String>,
    ) -> Result<Value, SlackError> {
        self.record("get_channels", json!({"limit": limit, "cursor": cursor}))
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<Value, SlackError> {
        self.record("post_message", json!({"channel_id": channel_id, "text": text}))
    }

    async fn post_reply(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<Value, SlackError> {
        self.record(
            "post_reply",
            json!({"channel_id": channel_id, "thread_ts": thread_ts, "text": text}),
        )
    }

    async fn add_reaction(
        &self,
        channel_id: &str,
        timestamp: &str,
        reaction: &str,
    ) -> Result<Value, SlackError> {
        self.record(
            "add_reaction",
            json!({"channel_id": channel_id, "timestamp": timestamp, "reaction": reaction}),
        )
    }

    async fn get_channel_history(
        &self,
        channel_id: &str,
        limit: Option<u64>,
    ) -> Result<Value, SlackError> {
        self.record(
            "get_channel_history",
            json!({"channel_id": channel_id, "limit": limit}),
        )
    }

    async fn get_thread_replies(
        &self,
        channel_id: &str,
        thread_ts: &str,
    ) -> Result<Value, SlackError> {
        self.record(
            "get_thread_replies",
            json!({"channel_id": channel_id, "thread_ts": thread_ts}),
        )
    }

    async fn get_users(
        &self,
        limit: Option<u64>,
        cursor: Option<String>,
    ) -> Result<Value, SlackError> {
        self.record("get_users", json!({"limit": limit, "cursor": cursor}))
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<Value, SlackError> {
        self.record("get_user_profile", json!({"user_id": user_id}))
    }
}

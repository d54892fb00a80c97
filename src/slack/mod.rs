pub(crate) mod client;
#[cfg(test)]
pub(crate) mod fake;

pub use client::{AuthIdentity, SlackClient};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Failure raised by the Slack Web API client.
///
/// The `Display` output is what ends up in the `{"error": ...}` payload of a
/// failed tool call, so API errors render as the bare Slack error code.
#[derive(Error, Debug)]
pub enum SlackError {
    #[error("{0}")]
    Api(String),

    #[error("rate_limited")]
    RateLimited { retry_after: Option<u64> },

    #[error("HTTP {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid bot token: {0}")]
    InvalidToken(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

/// One async call per Slack operation exposed as a tool.
///
/// Every method returns the raw JSON body of the Slack response on success.
#[async_trait]
pub trait SlackApi: Send + Sync {
    async fn get_channels(
        &self,
        limit: Option<u64>,
        cursor: Option<String>,
    ) -> Result<Value, SlackError>;

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<Value, SlackError>;

    async fn post_reply(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<Value, SlackError>;

    async fn add_reaction(
        &self,
        channel_id: &str,
        timestamp: &str,
        reaction: &str,
    ) -> Result<Value, SlackError>;

    async fn get_channel_history(
        &self,
        channel_id: &str,
        limit: Option<u64>,
    ) -> Result<Value, SlackError>;

    async fn get_thread_replies(
        &self,
        channel_id: &str,
        thread_ts: &str,
    ) -> Result<Value, SlackError>;

    async fn get_users(
        &self,
        limit: Option<u64>,
        cursor: Option<String>,
    ) -> Result<Value, SlackError>;

    async fn get_user_profile(&self, user_id: &str) -> Result<Value, SlackError>;
}

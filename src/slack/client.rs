use super::{SlackApi, SlackError};
use crate::config::SlackConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Slack caps page sizes for list endpoints at this value.
const MAX_PAGE_SIZE: u64 = 200;
const DEFAULT_PAGE_SIZE: u64 = 100;
const DEFAULT_HISTORY_LIMIT: u64 = 10;

/// Identity returned by `auth.test`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthIdentity {
    pub team_id: String,
    #[serde(default)]
    pub team: Option<String>,
}

/// Slack Web API client authenticated with a bot token
#[derive(Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    base_url: String,
    team_id: Option<String>,
}

impl SlackClient {
    pub fn new(bot_token: &str, settings: &SlackConfig) -> Result<Self, SlackError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", bot_token))
            .map_err(|e| SlackError::InvalidToken(e.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            team_id: None,
        })
    }

    /// Scope workspace-wide listings to the given team
    pub fn with_team_id(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Resolve the identity behind the bot token
    pub async fn auth_test(&self) -> Result<AuthIdentity, SlackError> {
        let body = self.post("auth.test", json!({})).await?;
        serde_json::from_value(body).map_err(|e| SlackError::Decode(e.to_string()))
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    async fn get(&self, method: &str, query: &[(&str, String)]) -> Result<Value, SlackError> {
        debug!("Slack API GET {}", method);
        let response = self.http.get(self.url(method)).query(query).send().await?;
        parse_response(method, response).await
    }

    async fn post(&self, method: &str, body: Value) -> Result<Value, SlackError> {
        debug!("Slack API POST {}", method);
        let response = self.http.post(self.url(method)).json(&body).send().await?;
        parse_response(method, response).await
    }

    /// Shared query for paginated workspace listings
    fn page_query(&self, limit: Option<u64>, cursor: Option<String>) -> Vec<(&'static str, String)> {
        let mut query = vec![(
            "limit",
            limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE).to_string(),
        )];
        if let Some(team_id) = &self.team_id {
            query.push(("team_id", team_id.clone()));
        }
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            query.push(("cursor", cursor));
        }
        query
    }
}

async fn parse_response(method: &str, response: reqwest::Response) -> Result<Value, SlackError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        warn!("Slack API rate limited on {} (retry after {:?}s)", method, retry_after);
        return Err(SlackError::RateLimited { retry_after });
    }

    if !status.is_success() {
        return Err(SlackError::Status(status.as_u16()));
    }

    let body: Value = response.json().await?;

    // Slack reports most failures as 200 with `"ok": false`
    if body.get("ok").and_then(Value::as_bool) == Some(false) {
        let code = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown_error");
        return Err(SlackError::Api(code.to_string()));
    }

    Ok(body)
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn get_channels(
        &self,
        limit: Option<u64>,
        cursor: Option<String>,
    ) -> Result<Value, SlackError> {
        let mut query = self.page_query(limit, cursor);
        query.push(("types", "public_channel".to_string()));
        query.push(("exclude_archived", "true".to_string()));
        self.get("conversations.list", &query).await
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<Value, SlackError> {
        self.post(
            "chat.postMessage",
            json!({
                "channel": channel_id,
                "text": text,
            }),
        )
        .await
    }

    async fn post_reply(
        &self,
        channel_id: &str,
        thread_ts: &str,
        text: &str,
    ) -> Result<Value, SlackError> {
        self.post(
            "chat.postMessage",
            json!({
                "channel": channel_id,
                "thread_ts": thread_ts,
                "text": text,
            }),
        )
        .await
    }

    async fn add_reaction(
        &self,
        channel_id: &str,
        timestamp: &str,
        reaction: &str,
    ) -> Result<Value, SlackError> {
        self.post(
            "reactions.add",
            json!({
                "channel": channel_id,
                "timestamp": timestamp,
                "name": reaction,
            }),
        )
        .await
    }

    async fn get_channel_history(
        &self,
        channel_id: &str,
        limit: Option<u64>,
    ) -> Result<Value, SlackError> {
        let query = [
            ("channel", channel_id.to_string()),
            ("limit", limit.unwrap_or(DEFAULT_HISTORY_LIMIT).to_string()),
        ];
        self.get("conversations.history", &query).await
    }

    async fn get_thread_replies(
        &self,
        channel_id: &str,
        thread_ts: &str,
    ) -> Result<Value, SlackError> {
        let query = [
            ("channel", channel_id.to_string()),
            ("ts", thread_ts.to_string()),
        ];
        self.get("conversations.replies", &query).await
    }

    async fn get_users(
        &self,
        limit: Option<u64>,
        cursor: Option<String>,
    ) -> Result<Value, SlackError> {
        let query = self.page_query(limit, cursor);
        self.get("users.list", &query).await
    }

    async fn get_user_profile(&self, user_id: &str) -> Result<Value, SlackError> {
        let query = [
            ("user", user_id.to_string()),
            ("include_labels", "true".to_string()),
        ];
        self.get("users.profile.get", &query).await
    }
}

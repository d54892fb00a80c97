use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Usually supplied through `SLACK_BOT_TOKEN` rather than the config file
    pub bot_token: Option<String>,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base_url: "https://slack.com/api".to_string(),
            request_timeout_secs: 30,
        }
    }
}

// Keep the token out of logs
impl fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackConfig")
            .field("bot_token", &self.bot_token.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// What happens to the process once the active client disconnects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    /// Shut the server down when the active session closes
    #[default]
    ServeOnce,
    /// Go back to idle and accept the next connection
    ServeMany,
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionMode::ServeOnce => "serve-once",
            SessionMode::ServeMany => "serve-many",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: SessionMode,
    /// Close the previous session when a new client connects. When false the
    /// old stream stays open, detached, until its own client goes away.
    pub close_superseded: bool,
    pub keep_alive_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: SessionMode::ServeOnce,
            close_superseded: true,
            keep_alive_secs: 15,
        }
    }
}

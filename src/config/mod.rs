pub mod types;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use std::path::Path;
pub use types::*;

/// Prefix for environment overrides, e.g. `SLACK_MCP__SESSION__MODE=serve-many`
const ENV_PREFIX: &str = "SLACK_MCP";

/// Load configuration from an optional TOML file layered with environment overrides
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();

    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("Failed to load config from: {}", path.display()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate the loaded configuration
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.logging.level.as_str()) {
        anyhow::bail!(
            "Invalid log level '{}'. Valid levels: {}",
            config.logging.level,
            valid_levels.join(", ")
        );
    }

    // Validate log format
    let valid_formats = ["pretty", "json"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        anyhow::bail!(
            "Invalid log format '{}'. Valid formats: {}",
            config.logging.format,
            valid_formats.join(", ")
        );
    }

    if config.slack.api_base_url.trim().is_empty() {
        anyhow::bail!("Slack API base URL must not be empty");
    }

    if config.slack.request_timeout_secs == 0 {
        anyhow::bail!("Slack request timeout must be at least one second");
    }

    if config.session.keep_alive_secs == 0 {
        anyhow::bail!("SSE keep-alive interval must be at least one second");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    #[serial]
    fn test_load_valid_config() {
        let config_content = r#"
[http]
host = "127.0.0.1"
port = 8080

[logging]
level = "debug"
format = "json"

[slack]
api_base_url = "http://localhost:9999/api"
request_timeout_secs = 5

[session]
mode = "serve-many"
close_superseded = false
keep_alive_secs = 30
"#;

        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.http.host, "127.0.0.1");
        assert_eq!(config.http.port, 8080);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.slack.api_base_url, "http://localhost:9999/api");
        assert_eq!(config.slack.request_timeout_secs, 5);
        assert_eq!(config.session.mode, SessionMode::ServeMany);
        assert!(!config.session.close_superseded);
        assert_eq!(config.session.keep_alive_secs, 30);
    }

    #[test]
    #[serial]
    fn test_missing_file_uses_defaults() {
        let config = load_config("does-not-exist.toml").unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 3001);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.slack.api_base_url, "https://slack.com/api");
        assert!(config.slack.bot_token.is_none());
        assert_eq!(config.session.mode, SessionMode::ServeOnce);
        assert!(config.session.close_superseded);
    }

    #[test]
    #[serial]
    fn test_partial_sections_keep_defaults() {
        let config_content = r#"
[http]
port = 4000

[session]
mode = "serve-many"
"#;

        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 4000);
        assert!(config.session.close_superseded);
        assert_eq!(config.session.keep_alive_secs, 15);
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        std::env::set_var("SLACK_MCP__HTTP__PORT", "5005");
        std::env::set_var("SLACK_MCP__SESSION__MODE", "serve-many");

        let result = load_config("does-not-exist.toml");

        std::env::remove_var("SLACK_MCP__HTTP__PORT");
        std::env::remove_var("SLACK_MCP__SESSION__MODE");

        let config = result.unwrap();
        assert_eq!(config.http.port, 5005);
        assert_eq!(config.session.mode, SessionMode::ServeMany);
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();

        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = AppConfig::default();
        config.logging.format = "xml".to_string();

        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_keep_alive() {
        let mut config = AppConfig::default();
        config.session.keep_alive_secs = 0;

        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_defaults() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }
}

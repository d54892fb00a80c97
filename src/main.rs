use anyhow::{Context, Result};
use clap::Parser;
use slack_mcp_server::slack::SlackClient;
use slack_mcp_server::{api, config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "slack-mcp-server")]
#[command(about = "MCP server for Slack workspace tools", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to configuration file (optional)
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Slack bot token
    #[arg(long, env = "SLACK_BOT_TOKEN", hide_env_values = true)]
    bot_token: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Override log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = config::load_config(&cli.config).with_context(|| {
        format!(
            "Failed to load configuration from: {}",
            cli.config.display()
        )
    })?;

    // Apply CLI overrides
    if let Some(log_level) = cli.log_level {
        config.logging.level = log_level;
    }
    if let Some(log_format) = cli.log_format {
        config.logging.format = log_format;
    }
    if let Some(port) = cli.port {
        config.http.port = port;
    }
    if let Some(host) = cli.host {
        config.http.host = host;
    }
    if let Some(token) = cli.bot_token {
        config.slack.bot_token = Some(token);
    }
    config::validate_config(&config)?;

    // Initialize logging
    init_logging(&config.logging)?;

    let bot_token = match config.slack.bot_token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => anyhow::bail!("Please set SLACK_BOT_TOKEN environment variable"),
    };

    // Print banner
    print_banner(&config);

    info!("Starting Slack MCP Server...");

    let client = SlackClient::new(&bot_token, &config.slack)
        .context("Failed to create Slack client")?;
    let identity = client
        .auth_test()
        .await
        .context("Slack auth.test failed")?;
    info!(
        "Authenticated to Slack team {} ({})",
        identity.team.as_deref().unwrap_or("unknown"),
        identity.team_id
    );
    let client = client.with_team_id(identity.team_id);

    api::start_server(config, Arc::new(client)).await?;

    info!("Server stopped");
    Ok(())
}

fn init_logging(config: &config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // Logs go to stderr so stdout stays clean
    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            // Default to pretty format
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}

fn print_banner(config: &config::AppConfig) {
    let version = env!("CARGO_PKG_VERSION");
    let width = 59usize;
    let border = "═".repeat(width + 2);
    let line = |content: &str| {
        info!("║ {:width$} ║", content, width = width);
    };

    info!("╔{}╗", border);
    line("SLACK MCP SERVER");
    line(&format!("Slack tools over MCP/SSE v{}", version));
    info!("╚{}╝", border);
    info!("");
    info!("Server Configuration:");
    info!("  → Address: {}:{}", config.http.host, config.http.port);
    info!("  → Slack API: {}", config.slack.api_base_url);
    info!("  → Session Mode: {}", config.session.mode);
    info!("  → Close Superseded: {}", config.session.close_superseded);
    info!("  → Log Level: {}", config.logging.level);
    info!("  → Log Format: {}", config.logging.format);
    info!("");
}

//! Cartwright - Preflight check for the user API
//!
//! Verifies the configured API endpoint is reachable and the token works
//! before a suite run. Exits non-zero when the check fails.

use cartwright::api::{User, UserApi};
use cartwright::config::Settings;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Cartwright - Smoke-check the user API before running suites
#[derive(Parser, Debug)]
#[command(name = "cartwright")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Override the API base URL (takes precedence over API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Override the bearer token (takes precedence over API_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Override the request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Cartwright preflight v{}", env!("CARGO_PKG_VERSION"));

    // Load settings, then apply command-line overrides
    let mut settings = Settings::from_env()?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(token) = args.token {
        settings.token = Some(token);
    }
    if let Some(secs) = args.timeout_secs {
        settings.timeout = std::time::Duration::from_secs(secs);
    }

    info!(
        base_url = %settings.base_url,
        authenticated = settings.token.is_some(),
        "Checking user API"
    );

    let api = UserApi::from_settings(&settings)?;
    let response = api.list_users().await?;

    if !response.is_success() {
        let detail = response.message().unwrap_or("no error message");
        anyhow::bail!("User API returned {}: {}", response.status, detail);
    }

    let users: Vec<User> = response.json()?;
    info!(count = users.len(), "User API is reachable");

    Ok(())
}

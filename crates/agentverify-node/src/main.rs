//! AgentVerify service — entry point.
//!
//! Starts the HTTP API over the in-memory trust-state engine with
//! configuration from a TOML file or defaults.

mod api;
mod config;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use agentverify_platform::HttpPlatformClient;

use config::AgentVerifyConfig;
use state::AppState;

/// AgentVerify Service
#[derive(Parser, Debug)]
#[command(name = "agentverify-node", version, about = "AgentVerify API service")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "agentverify.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the platform API base URL.
    #[arg(long)]
    platform_url: Option<String>,

    /// Bearer credential for the platform API.
    #[arg(long, env = "PLATFORM_API_KEY")]
    platform_api_key: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    // Handle --init flag
    if args.init {
        let config = AgentVerifyConfig::default();
        config.save(&args.config)?;
        tracing::info!(path = %args.config.display(), "wrote default config");
        return Ok(());
    }

    // Load configuration
    let mut config = AgentVerifyConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(platform_url) = args.platform_url {
        config.platform.base_url = platform_url;
    }
    if args.platform_api_key.is_some() {
        config.platform.api_key = args.platform_api_key;
    }
    config.logging.level = args.log_level;

    tracing::info!("AgentVerify service v{}", env!("CARGO_PKG_VERSION"));

    // Platform capability with a bounded request timeout.
    let platform = Arc::new(HttpPlatformClient::new(
        config.platform.base_url.clone(),
        config.platform.name.clone(),
        config.platform.api_key.clone(),
        Duration::from_secs(config.platform.timeout_secs),
    )?);

    let state = Arc::new(AppState::new(platform));

    // Best-effort sweep of expired challenges. Space reclamation only;
    // expiry is evaluated at read time regardless.
    if config.maintenance.challenge_sweep {
        let sweep_state = Arc::clone(&state);
        let interval = Duration::from_secs(config.maintenance.sweep_interval_secs.max(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                sweep_state.challenges.purge_expired();
            }
        });
    }

    let listen_addr: SocketAddr =
        format!("{}:{}", config.api.listen_addr, config.api.port).parse()?;
    api::start_api_server(listen_addr, state).await?;

    tracing::info!("AgentVerify service exited cleanly");
    Ok(())
}

//! Alice Yamaha Server - standalone adapter between the Alice smart-home
//! platform and Yamaha AV receivers on the local network.

mod config;

use std::path::PathBuf;

use alice_yamaha_core::{bootstrap_state, start_server};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;

use crate::config::ServerConfig;

/// Alice Yamaha Server - smart-home skill backend for Yamaha AV receivers.
#[derive(Parser, Debug)]
#[command(name = "alice-yamaha-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (YAML).
    /// Defaults to ~/.alice-yamaha-skill.yml when present.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(short, long, default_value = "info", env = "ALICE_YAMAHA_LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// Bind port (overrides config file and environment).
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Identity provider URL (overrides config file and environment).
    #[arg(long, value_name = "URL")]
    identity_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .format_timestamp_millis()
        .init();

    log::info!("Alice Yamaha Server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config =
        ServerConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Apply CLI overrides
    if let Some(port) = args.port {
        config.bind_port = port;
    }
    if let Some(url) = args.identity_url {
        config.identity_url = url;
    }

    log::info!(
        "Configuration: bind_port={}, url_prefix={}, users={}, modes={}",
        config.bind_port,
        config.url_prefix,
        config.users.len(),
        config.input_map.len()
    );

    // Wire receiver access and identity validation
    let app_state =
        bootstrap_state(config.to_core_config()).context("Failed to bootstrap services")?;

    start_server(app_state, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    log::info!("Shutdown complete");
    Ok(())
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("Shutdown signal received");
}

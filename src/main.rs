//! storefront - a small token-authenticated product catalogue service
//!
//! This is the main entry point for the storefront application.

use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::info;

use storefront::auth::{AuthConfig, AuthManager};
use storefront::config::Config;
use storefront::database::SqliteDatabase;
use storefront::seed::seed_demo_data;
use storefront::server::{AppState, Server};
use storefront::telemetry::init_tracing;

/// storefront - a small token-authenticated product catalogue service
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "STOREFRONT_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_config(&args)?;

    init_tracing(&config.logging)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting storefront");

    let database = Arc::new(SqliteDatabase::new(&config.database.path).await?);
    info!(path = %config.database.path, "Database initialized");

    let auth_config = AuthConfig::from_settings(&config.auth)?;
    let auth_manager = Arc::new(AuthManager::new(Arc::clone(&database), auth_config));
    info!(
        algorithm = %config.auth.algorithm,
        access_token_expire_minutes = config.auth.access_token_expire_minutes,
        "Authentication manager initialized"
    );

    if config.seed.enabled {
        seed_demo_data(database.as_ref(), &auth_manager).await?;
    }

    let state = AppState {
        auth_manager,
        database,
    };

    let server = Server::new(config.server.clone(), state);

    info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting HTTP server"
    );

    server.run(shutdown_signal()).await?;

    info!("storefront shutdown complete");
    Ok(())
}

/// Load configuration from file or environment
fn load_config(args: &Args) -> anyhow::Result<Config> {
    let config = match &args.config {
        Some(path) => {
            // Use eprintln! since tracing is not yet initialized
            eprintln!("Loading configuration from file: {}", path);
            Config::from_file(path)
        }
        None => {
            eprintln!("Loading configuration from environment variables");
            Config::from_env()
        }
    }
    .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid config: {}", e))?;

    Ok(config)
}

/// Create a future that resolves when a shutdown signal is received
///
/// If a signal handler cannot be installed, that branch never resolves.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

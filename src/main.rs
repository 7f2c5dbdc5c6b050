//! `storefront`: the storefront API server.
//!
//! # Usage
//!
//! ```text
//! storefront                             # serve on 127.0.0.1:5000
//! storefront -c storefront.toml          # start with a config file
//! storefront -l 0.0.0.0:8080             # override the listen address
//! storefront --log-level debug           # log payloads
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use storefront_api::config::AppConfig;
use storefront_api::http::{ApiServer, AppState};
use storefront_api::lifecycle::{setup_tracing, StoreSystem};

#[derive(Parser)]
#[command(name = "storefront", version, about = "Token-gated storefront REST API")]
struct Cli {
    /// Path to TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address (e.g. "0.0.0.0:8080").
    #[arg(short, long)]
    listen: Option<String>,

    /// Override the log level when RUST_LOG is unset.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen;
    }
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }

    setup_tracing(&config.log.level);

    let system = StoreSystem::new(&config.store);
    let server = ApiServer::new(AppState::new(&system, config.api.clone()));

    let listener = tokio::net::TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.listen_addr))?;

    server
        .serve_with_shutdown(listener, shutdown_signal())
        .await
        .context("server error")?;

    system.shutdown().await.context("store shutdown failed")?;
    info!("Goodbye");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

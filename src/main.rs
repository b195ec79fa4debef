//! Canonical host gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌───────────────────────────────────────────────┐
//!                  │               CANONICAL-HOST GATEWAY          │
//!   Client Request │  ┌──────────┐   ┌───────────┐   ┌──────────┐  │
//!   ───────────────┼─▶│ http     │──▶│ redirect  │──▶│ upstream │──┼──▶ Application
//!                  │  │ server   │   │ middleware│   │ forward  │  │
//!                  │  └──────────┘   └─────┬─────┘   └──────────┘  │
//!   301 Location   │                       │                       │
//!   ◀──────────────┼───────────────────────┘                       │
//!                  │                                               │
//!                  │  config · observability · lifecycle           │
//!                  └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use canonical_host::config::resolve_config;
use canonical_host::lifecycle::{signals, Shutdown};
use canonical_host::observability::{logging, metrics};
use canonical_host::HttpServer;

#[derive(Parser)]
#[command(name = "canonical-host")]
#[command(about = "Redirects requests to the canonical www / non-www host", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.as_deref(), cli.bind)?;

    logging::init_logging(&config.observability);

    tracing::info!("canonical-host v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(&shutdown);

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! Request forwarder service.
//!
//! # Architecture Overview
//!
//! ```text
//!                              ┌──────────────────────────────────────────────┐
//!                              │               REQUEST FORWARDER               │
//!     POST /api/proxy          │  ┌─────────┐    ┌─────────┐    ┌──────────┐  │
//!     ─────────────────────────┼─▶│  http   │───▶│ forward │───▶│ prepare  │  │
//!                              │  │ server  │    │         │    │ + client │  │
//!                              │  └─────────┘    └────┬────┘    └────┬─────┘  │
//!                              │                      │              │        │
//!                              │               ┌──────▼──────┐       │        │
//!                              │               │ resilience  │       ▼        │
//!     Envelope                 │  ┌─────────┐  │  deadline   │  ┌─────────┐   │
//!     ◀────────────────────────┼──│response │◀─┴─────────────┴──│ reqwest │◀──┼──── Target
//!                              │  └─────────┘                   └─────────┘   │     Server
//!                              │                                              │
//!                              │  config · observability · lifecycle · net    │
//!                              └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use request_forwarder::config::load_with_env;
use request_forwarder::http::HttpServer;
use request_forwarder::lifecycle::{wait_for_signal, Shutdown};
use request_forwarder::net::load_tls_config;
use request_forwarder::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "request-forwarder")]
#[command(about = "HTTP request forwarding backend for API testing", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_with_env(args.config.as_deref())?;

    logging::init(&config.observability);
    tracing::info!("request-forwarder v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        tls = config.listener.tls.is_some(),
        default_timeout_ms = config.forwarding.default_timeout_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Shutdown signal received");
        shutdown.trigger();
    });

    match tls {
        Some(tls) => {
            let tls_config = load_tls_config(&tls).await?;
            server.run_tls(tls_config, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

//! Chain gateway server.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 CHAIN GATEWAY                 │
//!                      │                                               │
//!   Client Request     │  ┌─────────┐    ┌──────────┐    ┌──────────┐  │
//!   ───────────────────┼─▶│  http   │───▶│ handlers │───▶│  chain   │  │
//!                      │  │ server  │    │ + render │    │  client  │  │
//!                      │  └─────────┘    └──────────┘    └────┬─────┘  │
//!                      │                                      │        │
//!                      │                       ┌──────────────┼─────┐  │
//!                      │                       ▼              ▼     │  │
//!                      │                 ┌──────────┐  ┌──────────┐ │  │
//!                      │                 │   scan   │  │ wallet + │ │  │
//!                      │                 │          │  │ transfer │ │  │
//!                      │                 └────┬─────┘  └────┬─────┘ │  │
//!                      │                      └──────┬──────┘       │  │
//!                      │                             ▼              │  │
//!                      │                       ┌──────────┐         │  │
//!                      │                       │   node   │─────────┼──┼──▶ JSON-RPC
//!                      │                       └──────────┘         │  │     Node
//!                      │  config · observability · lifecycle ───────┘  │
//!                      └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use chain_gateway::config::{load_config, validate_config, GatewayConfig};
use chain_gateway::lifecycle::{wait_for_signal, Shutdown};
use chain_gateway::observability::{logging, metrics};
use chain_gateway::{ChainClient, HttpServer};

#[derive(Parser, Debug)]
#[command(name = "chain-gateway")]
#[command(about = "HTTP gateway over a blockchain node's JSON-RPC interface", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Node JSON-RPC URL (overrides the config file).
    #[arg(short = 'u', long)]
    rpc_url: Option<String>,

    /// Local port for the HTTP server (overrides the bind address port).
    #[arg(short, long)]
    port: Option<u16>,
}

fn resolve_config(args: &Args) -> Result<GatewayConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    if let Some(rpc_url) = &args.rpc_url {
        config.node.rpc_url = rpc_url.clone();
    }
    if let Some(port) = args.port {
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map(|(host, _)| host.to_string())
            .unwrap_or_else(|| "0.0.0.0".to_string());
        config.listener.bind_address = format!("{}:{}", host, port);
    }

    validate_config(&config).map_err(|errors| {
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        format!("invalid configuration: {}", joined.join(", "))
    })?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = resolve_config(&args)?;

    logging::init_tracing(&config.observability.log_level);
    tracing::info!("chain-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        rpc_url = %config.node.rpc_url,
        recent_tx_limit = config.scan.recent_tx_limit,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = ChainClient::connect(&config.node)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.signal();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    HttpServer::new(&config, client)
        .run(listener, server_shutdown)
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

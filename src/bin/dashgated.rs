//! dashgated: dashgate daemon.
//!
//! Serves the aggregation endpoints over HTTP from a single shared
//! [`Gateway`](dashgate::Gateway).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dashgate::GatewayError;
use dashgate::server::config::{Config, Secrets};
use dashgate::server::router;

/// dashgate daemon: cache-through aggregation gateway.
#[derive(Parser)]
#[command(name = "dashgated")]
#[command(version = dashgate::PKG_VERSION)]
#[command(about = "Cache-through aggregation gateway for dashboard data")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to, overriding the config file.
    #[arg(short, long, env = "DASHGATE_ADDRESS")]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    let gateway = config.gateway_builder(&secrets).build()?;

    let address = args.address.unwrap_or_else(|| config.server.address.clone());
    let addr: SocketAddr = address
        .parse()
        .map_err(|e| GatewayError::Configuration(format!("Invalid address {address:?}: {e}")))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        version = dashgate::PKG_VERSION,
        %addr,
        ttl_secs = config.cache.ttl_secs,
        "dashgated starting"
    );

    let app = router(Arc::new(gateway));
    tokio::select! {
        result = axum::serve(listener, app) => result?,
        _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
    }

    Ok(())
}

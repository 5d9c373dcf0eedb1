//! Bazaar Gateway - Offline-first caching gateway for a PWA storefront

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod error;
mod routes;
mod state;

use config::Config;
use routes::{create_router, TargetRouter};
use state::AppState;

use bazaar_catalog::HttpNetwork;
use bazaar_core::{OfflineWorker, WorkerConfig};
use bazaar_storage::LocalStore;

/// Bazaar Gateway - Offline-first caching gateway for a PWA storefront
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "BAZAAR_GATEWAY_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "BAZAAR_GATEWAY_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting Bazaar Gateway v{}", env!("CARGO_PKG_VERSION"));

    // Initialize storage backend
    let store = Arc::new(LocalStore::new(&config.storage.path).await?);

    // Initialize the network client
    let network = Arc::new(HttpNetwork::new(Duration::from_secs(
        config.catalog.timeout_secs,
    ))?);

    // Build the offline worker
    let worker = Arc::new(OfflineWorker::new(
        WorkerConfig {
            bucket_name: config.cache.bucket_name(),
            seed_urls: config.seed_urls()?,
            offline_url: config.offline_url()?,
            rules: config.policy.clone(),
        },
        store,
        network,
    ));

    // Install must complete before activation so the offline fallback is
    // guaranteed present, and activation must complete before we serve.
    worker.on_install().await?;
    let purged = worker.on_activate().await?;
    if purged > 0 {
        info!("Purged {} stale cache bucket(s)", purged);
    }

    // Build the target router
    let targets = Arc::new(TargetRouter::new(config.origin_url()?, &config.upstream.routes)?);

    // Create application state and router
    let state = AppState::new(worker, targets);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);
    info!("Storefront origin: {}", config.upstream.origin);
    info!("Cache bucket: {}", config.cache.bucket_name());

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}

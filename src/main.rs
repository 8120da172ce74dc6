use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

mod config;
mod dashboard;
mod live_data;
mod models;
mod sync;

use config::Config;
use dashboard::AppState;
use live_data::{CricketProvider, MockCricketProvider};
use sync::SyncController;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    // Mock data source. A real cricket-data integration plugs in here by
    // implementing `CricketProvider`.
    let provider: Arc<dyn CricketProvider> = Arc::new(
        MockCricketProvider::new(config.seed)
            .with_live_update_chance(config.live_update_chance)
            .with_faults(&config.fail),
    );
    match config.seed {
        Some(seed) => info!("Using {} (seed {})", provider.name(), seed),
        None => info!("Using {} (random seed)", provider.name()),
    }
    if !config.fail.is_empty() {
        warn!("Simulating failures for feeds: {:?}", config.fail);
    }

    let controller = Arc::new(SyncController::start(provider, config.cadence()));

    // Start the dashboard HTTP server
    let app = dashboard::router(AppState {
        controller: Arc::clone(&controller),
    });
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Run dashboard server until Ctrl-C, then stop polling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    controller.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

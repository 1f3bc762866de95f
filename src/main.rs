// csk-sniffer - YOLO detection results browser with session-scoped cache busting
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use csk_sniffer::cli::Args;
use csk_sniffer::config::AppConfig;
use csk_sniffer::pipeline::CommandPipeline;
use csk_sniffer::server::create_router;
use csk_sniffer::utils::logging;
use csk_sniffer::workspace::OutputWorkspace;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let mut config = AppConfig::load(args.config.as_deref())?;
    args.apply(&mut config);

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting csk-sniffer v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Prepare output directories
    OutputWorkspace::new(config.storage.clone()).ensure_directories()?;

    // Phase 4: Build and start HTTP server
    let pipeline = Arc::new(CommandPipeline::new(config.pipeline.clone()));
    let app = create_router(config.clone(), pipeline)?;
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    info!("Starting CSK Sniffer on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 5: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}

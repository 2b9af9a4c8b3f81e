//! # LinkedIn Insights Server
//!
//! Main entry point: loads configuration, wires the Shaku module and serves
//! the REST API until SIGINT or SIGTERM.

use insights_config::ConfigLoader;
use insights_core::telemetry::{init_telemetry, shutdown_telemetry};
use insights_core::{InsightsError, InsightsResult};
use insights_rest::create_router_from_module;
use insights_server::di::{build_module, InfrastructureResolver};
use insights_server::startup::{install_metrics, print_startup_info, telemetry_config};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("Application error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> InsightsResult<()> {
    // Load configuration
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    init_telemetry(&telemetry_config(&config))?;

    info!("Starting LinkedIn Insights server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    let metrics = install_metrics(&config)?;

    // Build DI module
    let module = build_module(&config).await?;
    let db_pool = module.database_pool();

    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let router = create_router_from_module(module.as_ref(), &config, metrics);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| InsightsError::Internal(format!("Failed to bind {addr}: {e}")))?;

    print_startup_info(&config);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| InsightsError::Internal(format!("REST server error: {e}")))?;

    db_pool.close().await;
    shutdown_telemetry();

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}

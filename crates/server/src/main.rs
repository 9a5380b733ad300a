use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relocator_core::{
    create_retriever, create_storage, load_config, validate_config, Relocator, Retriever, Storage,
};
use relocator_server::{api::create_router, state::AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting relocator v{}", VERSION);

    // Determine config path
    let config_path = std::env::var("RELOCATOR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Retriever backend: {:?}", config.retriever.backend);
    info!("Storage backend: {:?}", config.storage.backend);
    info!("Commit policy: {:?}", config.relocator.commit_policy);

    // Create backends
    let retriever: Arc<dyn Retriever> = Arc::from(
        create_retriever(&config.retriever).context("Failed to create retriever")?,
    );
    let storage: Arc<dyn Storage> =
        Arc::from(create_storage(&config.storage).context("Failed to create storage")?);
    info!(
        "Using retriever: {}, storage: {}",
        retriever.name(),
        storage.name()
    );

    let relocator = Arc::new(Relocator::new(
        config.relocator.clone(),
        retriever,
        storage,
    ));

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), Arc::clone(&relocator)));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Let in-flight jobs finish; nothing is cancelled
    let grace = Duration::from_secs(config.relocator.shutdown_grace_secs);
    let active = relocator.active_jobs();
    if active > 0 {
        info!("Waiting up to {:?} for {} active job(s)...", grace, active);
        if tokio::time::timeout(grace, relocator.wait_idle())
            .await
            .is_err()
        {
            warn!(
                "Shutdown grace period elapsed with {} job(s) still active",
                relocator.active_jobs()
            );
        }
    }

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

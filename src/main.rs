//! Docusphere server.
//!
//! Loads configuration, connects the stores and the asset store, and serves
//! the HTTP API until Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt};

use docusphere_api::{AppState, build_app};
use docusphere_core::config::{AppConfig, LogFormat, LoggingConfig};
use docusphere_database::Stores;
use docusphere_storage::build_asset_store;

#[tokio::main]
async fn main() {
    let env = std::env::var("DOCUSPHERE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e:#}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        LogFormat::Pretty => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Docusphere v{}", env!("CARGO_PKG_VERSION"));

    let stores = Stores::connect(&config.database)
        .await
        .context("Failed to initialize stores")?;
    tracing::info!(provider = stores.provider_type(), "Stores ready");

    let assets = build_asset_store(&config.storage)
        .await
        .context("Failed to initialize asset store")?;
    tracing::info!(provider = assets.provider_type(), "Asset store ready");

    if config.auth.jwt_secret == "CHANGE_ME_IN_PRODUCTION" {
        tracing::warn!("Using the default JWT secret; set DOCUSPHERE__AUTH__JWT_SECRET");
    }

    let addr = config.server.bind_address();
    let state = AppState::new(config, stores.clone(), assets);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Docusphere listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, draining connections");
    })
    .await
    .context("HTTP server failed")?;

    stores.close().await;
    tracing::info!("Docusphere shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
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
}

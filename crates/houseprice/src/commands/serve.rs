//! Serve command - trains the model and serves the HTTP API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use config::Config;
use database::{create_pool, run_migrations};
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::load_model;
use crate::api::{AppState, BASE_PATH, router};

/// Runs the serve command.
///
/// Opens the settings database, fits the model, then serves requests until
/// Ctrl-C is received.
///
/// # Errors
///
/// Returns an error if startup fails or the server stops unexpectedly.
pub async fn run(config: &Config, bind: SocketAddr) -> Result<()> {
    let pool = create_pool(&config.database_url)
        .await
        .with_context(|| format!("Failed to open settings database {}", config.database_url))?;
    run_migrations(&pool)
        .await
        .context("Failed to run settings migrations")?;

    let model = load_model(config).await?;
    let report = model.report();
    info!(
        mse = report.mse,
        train_rows = report.train_rows,
        test_rows = report.test_rows,
        "Model ready"
    );

    let state = AppState::new(Arc::new(model), pool.clone());

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    info!(address = %listener.local_addr()?, base_path = BASE_PATH, "Serving house price API");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

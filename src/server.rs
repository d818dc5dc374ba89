//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, storage setup, service wiring, and the Axum
//! server lifecycle.

use crate::application::services::{ExportService, UrlService};
use crate::config::Config;
use crate::infrastructure::persistence::{PgExportSource, PgUrlRepository};
use crate::infrastructure::storage::LocalObjectStorage;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the PostgreSQL pool using the pool settings from `config`.
///
/// # Errors
///
/// Returns an error if the database cannot be reached within the connect timeout.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Connected to database"
    );
    Ok(pool)
}

/// Builds the services shared by the HTTP server and the admin CLI.
///
/// # Errors
///
/// Returns an error if `STORAGE_PUBLIC_URL` cannot be parsed.
pub fn build_state(pool: PgPool, config: &Config) -> Result<AppState> {
    let pool = Arc::new(pool);

    let storage = LocalObjectStorage::new(&config.storage_root, &config.storage_public_url)
        .context("Invalid STORAGE_PUBLIC_URL")?;

    let url_service = Arc::new(UrlService::new(Arc::new(PgUrlRepository::new(
        pool.clone(),
    ))));
    let export_service = Arc::new(ExportService::new(
        Arc::new(PgExportSource::new(pool)),
        Arc::new(storage),
        config.export_settings(),
    ));

    Ok(AppState::new(url_service, export_service))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Filesystem object storage for reports
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let state = build_state(pool, &config)?;

    if !state.export_service.storage_ready().await {
        tracing::warn!(
            root = %config.storage_root,
            "Storage root is not writable, exports will fail"
        );
    }

    let app = app_router(state, &config.storage_root);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on Unix.
///
/// In-flight requests, including running exports, are allowed to finish.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

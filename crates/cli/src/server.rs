//! # CLI Server
//!
//! Connects to Postgres, applies pending migrations and serves the API until
//! a shutdown signal arrives.

use std::net::SocketAddr;

use error::{AppError, Result};
use migration::{Migrator, MigratorTrait as _};
use server::{create_app_router, AppState, ServerResult};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    commands::ServeArgs,
    config::{build_database_url, parse_socket_addr, DatabaseConfig},
};

/// Starts the API server
///
/// # Errors
///
/// Returns an error if the database is unreachable, a migration fails or the
/// address cannot be bound.
pub async fn serve(config: &DatabaseConfig, args: &ServeArgs) -> Result<()> {
    let address = parse_socket_addr(&args.host, args.port)
        .map_err(|e| AppError::config(format!("Invalid address {}:{}: {}", args.host, args.port, e)))?;

    info!(
        target: "serve",
        host = %config.host,
        port = %config.port,
        database = %config.database,
        "Connecting to database..."
    );
    let db = migration::connect_to_database(&build_database_url(config))
        .await
        .map_err(|e| AppError::database(format!("Failed to connect to database: {}", e)))?;

    if args.skip_migrations {
        warn!(target: "serve", "Skipping database migrations");
    }
    else {
        Migrator::up(&db, None)
            .await
            .map_err(|e| AppError::migration(format!("Failed to run database migrations: {}", e)))?;
        info!(target: "serve", "Database migrations completed successfully");
    }

    let app = create_app_router(AppState::new(db));
    serve_http(app, address).await
}

async fn serve_http(app: axum::Router, address: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| AppError::config(format!("Failed to bind to {}: {}", address, e)))?;

    let started = ServerResult::new(&address.to_string());
    info!(target: "serve", address = %started.address, started_at = %started.started_at, "Listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(target: "serve", "Server stopped");
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(target: "serve", error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(target: "serve", error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!(target: "serve", "Shutdown signal received");
}

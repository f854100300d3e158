use anyhow::{Context, Result};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

mod handlers;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use common::config::Settings;
use common::db::repositories::EmployeeRepository;
use common::db::DbPool;
use common::errors::StoreError;
use common::telemetry;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Settings::load().context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    // Initialize tracing
    telemetry::init_logging(
        &config.observability.log_level,
        config.observability.log_format,
    )?;
    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database_host = %config.database.host,
        database_name = %config.database.name,
        "Configuration loaded"
    );

    // Initialize Prometheus metrics recorder
    let metrics_handle = telemetry::install_metrics_recorder()?;

    // Initialize database connection pool
    let db_pool = DbPool::connect_lazy(&config.database);
    match db_pool.health_check().await {
        Ok(()) => {
            tracing::info!("Connected to PostgreSQL database");
            if config.database.run_migrations {
                db_pool
                    .run_migrations()
                    .await
                    .context("Failed to apply database migrations")?;
            }
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Database unreachable at startup; requests will fail until it becomes available"
            );
            if config.database.run_migrations {
                tracing::warn!("Database migrations skipped: database unreachable");
            }
        }
    }

    // Create application state
    let repository = EmployeeRepository::new(db_pool.clone());
    let state = AppState::new(Arc::new(repository), metrics_handle);

    // Create router
    let app = routes::create_router(state);

    // Start server
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(addr = %addr, "Server running");

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    let supervisor = async {
        if config.database.fail_fast {
            let interval = Duration::from_secs(config.database.health_check_interval_seconds);
            db_pool.supervise(interval).await
        } else {
            std::future::pending::<StoreError>().await
        }
    };

    tokio::select! {
        result = server => {
            result.context("HTTP server error")?;
        }
        fault = supervisor => {
            tracing::error!(error = %fault, "Terminating after unrecoverable database pool fault");
            return Err(anyhow::Error::new(fault).context("Database pool fault"));
        }
    }

    db_pool.close().await;
    tracing::info!("API server stopped");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Initiating graceful shutdown");
}

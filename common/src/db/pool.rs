// PostgreSQL connection pool implementation

use crate::config::DatabaseConfig;
use crate::errors::StoreError;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, instrument, warn};

static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Database connection pool wrapper
/// Provides a bounded, lazily connected pool to PostgreSQL with health checking
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    /// Create a new database connection pool
    ///
    /// No connection is opened here. An unreachable database therefore does
    /// not prevent startup; the first statement that needs a connection
    /// reports the failure.
    #[instrument(skip(config), fields(host = %config.host, database = %config.name))]
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect_lazy_with(options);

        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database connection pool created"
        );

        Self { pool }
    }

    /// Wrap an already configured pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool
    ///
    /// This is used by repositories to execute queries
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Perform a health check on the database connection
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::PoolTimedOut => {
                    warn!(error = %e, "Database health check waited too long for a connection");
                    StoreError::PoolExhausted(e.to_string())
                }
                e => {
                    error!(error = %e, "Database health check failed");
                    StoreError::HealthCheckFailed(e.to_string())
                }
            })?;

        tracing::debug!("Database health check passed");
        Ok(())
    }

    /// Apply the embedded schema migrations
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        MIGRATOR.run(&self.pool).await.map_err(|e| {
            error!(error = %e, "Database migrations failed");
            StoreError::MigrationFailed(e.to_string())
        })?;

        info!("Database migrations applied");
        Ok(())
    }

    /// Watch the pool and resolve with the first unrecoverable fault
    ///
    /// The pool counts as established after its first successful health
    /// check. Failures before that point are only logged, since the database
    /// may still be starting. A failure after it is returned to the caller,
    /// which is expected to terminate the process. A check that times out
    /// waiting for a free connection is logged and never fatal.
    #[instrument(skip(self))]
    pub async fn supervise(&self, interval: Duration) -> StoreError {
        supervise_checks(interval, move || self.health_check()).await
    }

    /// Get the current number of connections in the pool
    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    /// Get the number of idle connections in the pool
    pub fn num_idle(&self) -> usize {
        self.pool.num_idle()
    }

    /// Close the connection pool gracefully
    ///
    /// Called once during graceful shutdown, after the HTTP server has
    /// drained in-flight requests
    #[instrument(skip(self))]
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

async fn supervise_checks<F, Fut>(interval: Duration, mut check: F) -> StoreError
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), StoreError>>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut established = false;

    loop {
        ticker.tick().await;

        match check().await {
            Ok(()) => {
                if !established {
                    info!("Database connection established; pool supervision armed");
                    established = true;
                }
            }
            Err(StoreError::PoolExhausted(detail)) => {
                warn!(error = %detail, "All pooled connections busy; skipping health check");
            }
            Err(e) if established => {
                error!(error = %e, "Unrecoverable database pool fault");
                return e;
            }
            Err(e) => {
                warn!(error = %e, "Database not reachable yet");
            }
        }
    }
}

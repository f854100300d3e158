// Error handling framework

use thiserror::Error;

/// Request validation errors
///
/// The display strings are returned to clients verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required and must be a string")]
    InvalidName,

    #[error("Salary is required and must be a positive number")]
    InvalidSalary,

    #[error("Role is required and must be a string")]
    InvalidRole,

    #[error("ID must be a positive integer")]
    InvalidId,

    #[error("Request body must be valid JSON: {0}")]
    MalformedBody(String),
}

/// Errors raised by the backing relational store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Database health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Connection pool exhausted: {0}")]
    PoolExhausted(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                // SQLSTATE class 23 covers integrity constraint violations
                match db_err.code() {
                    Some(code) if code.starts_with("23") => {
                        StoreError::ConstraintViolation(db_err.message().to_string())
                    }
                    _ => StoreError::QueryFailed(db_err.message().to_string()),
                }
            }
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted(err.to_string()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::ConnectionFailed(err.to_string()),
            sqlx::Error::Migrate(e) => StoreError::MigrationFailed(e.to_string()),
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

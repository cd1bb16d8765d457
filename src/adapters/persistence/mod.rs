use std::future::Future;
use std::time::Duration;

use sqlx::PgPool;

use crate::app_error::{AppError, AppResult};

pub mod subscription;

/// Gateway to Postgres. Owns the connection pool for the process lifetime.
#[derive(Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
    query_timeout: Duration,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        PostgresPersistence {
            pool,
            query_timeout,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close the pool, waiting for leased connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }

    /// Run one storage call under the query deadline.
    ///
    /// When the deadline elapses the query future is dropped, which aborts the
    /// in-flight statement and returns its connection to the pool.
    async fn run<T, F>(&self, op: &'static str, query: F) -> AppResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(result) => result.map_err(|err| map_db_error(op, err)),
            Err(_) => {
                tracing::warn!(
                    operation = op,
                    timeout_ms = self.query_timeout.as_millis() as u64,
                    "Database call timed out"
                );
                Err(AppError::Timeout(op.to_string()))
            }
        }
    }
}

/// Classify an engine error into the application taxonomy, tagging it with the
/// repository operation that produced it.
pub fn map_db_error(op: &'static str, err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::RowNotFound => AppError::NotFound,
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::ConstraintViolation(format!(
                "{op}: subscription already exists for this user and service"
            ))
        }
        sqlx::Error::Database(db_err) if db_err.is_check_violation() => {
            AppError::InvalidInput(format!("{op}: value rejected by storage constraint"))
        }
        _ => {
            // Display only: Debug may carry connection details.
            tracing::error!(operation = op, error = %err, "Database error");
            AppError::StorageUnavailable(format!("{op}: {err}"))
        }
    }
}

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;

use crate::infra::error::InfraError;

pub struct AppConfig {
    /// Postgres DSN. Carries credentials, never log it.
    pub database_url: SecretString,
    pub bind_addr: SocketAddr,
    pub cors_origin: HeaderValue,
    pub db: DbConfig,
    /// Apply embedded migrations before serving.
    pub run_migrations: bool,
    /// JSON-lines file receiving exported subscriptions.
    pub export_path: PathBuf,
    /// Optional structured (JSON) log file in addition to console output.
    pub log_file: Option<PathBuf>,
}

/// Connection pool bounds and per-call deadline.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
    pub query_timeout: Duration,
}

impl DbConfig {
    pub fn from_env() -> Self {
        Self {
            max_connections: get_env_default("DB_MAX_CONNECTIONS", 10),
            min_connections: get_env_default("DB_MIN_CONNECTIONS", 2),
            max_lifetime: Duration::from_secs(get_env_default("DB_MAX_LIFETIME_SECS", 3600)),
            idle_timeout: Duration::from_secs(get_env_default("DB_IDLE_TIMEOUT_SECS", 60)),
            acquire_timeout: Duration::from_secs(get_env_default("DB_ACQUIRE_TIMEOUT_SECS", 5)),
            query_timeout: Duration::from_secs(get_env_default("DB_QUERY_TIMEOUT_SECS", 10)),
        }
    }

    pub fn validate(&self) -> Result<(), InfraError> {
        if self.max_connections == 0 {
            return Err(InfraError::ConfigInvalid(
                "DB_MAX_CONNECTIONS must be at least 1".into(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(InfraError::ConfigInvalid(format!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                self.min_connections, self.max_connections
            )));
        }
        if self.query_timeout.is_zero() {
            return Err(InfraError::ConfigInvalid(
                "DB_QUERY_TIMEOUT_SECS must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let database_url: SecretString =
            SecretString::new(get_env::<String>("DATABASE_URL").into());

        let bind_addr: SocketAddr =
            get_env_default("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 8080)));
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .map_err(|_| InfraError::ConfigInvalid("CORS_ORIGIN is not a valid header value".into()))?;

        let db = DbConfig::from_env();
        db.validate()?;

        let run_migrations: bool = get_env_default("RUN_MIGRATIONS", true);
        let export_path: PathBuf =
            get_env_default("EXPORT_PATH", PathBuf::from("subscriptions-export.jsonl"));
        let log_file: Option<PathBuf> = std::env::var("LOG_FILE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            database_url,
            bind_addr,
            cors_origin,
            db,
            run_migrations,
            export_path,
            log_file,
        })
    }
}

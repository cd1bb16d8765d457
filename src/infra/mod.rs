use crate::{
    adapters::persistence::PostgresPersistence,
    infra::{config::DbConfig, db::init_db, error::InfraError},
};
use secrecy::SecretString;

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod setup;

pub async fn postgres_persistence(
    database_url: &SecretString,
    db_config: &DbConfig,
) -> Result<PostgresPersistence, InfraError> {
    let pool = init_db(database_url, db_config).await?;
    Ok(PostgresPersistence::new(pool, db_config.query_timeout))
}

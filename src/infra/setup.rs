use crate::{
    adapters::{http::app_state::AppState, persistence::PostgresPersistence, sink::json_lines::JsonLinesSink},
    infra::{config::AppConfig, db::run_migrations, error::InfraError, postgres_persistence},
    use_cases::{
        subscription::{SubscriptionRepo, SubscriptionUseCases},
        subscription_export::SubscriptionExportUseCases,
    },
};
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Wire persistence, sink and use cases.
///
/// The persistence handle is returned alongside the state so the caller can
/// close the pool on shutdown.
pub async fn init_app_state(config: AppConfig) -> Result<(AppState, PostgresPersistence), InfraError> {
    let persistence = postgres_persistence(&config.database_url, &config.db).await?;

    if config.run_migrations {
        run_migrations(persistence.pool()).await?;
    }

    let subscription_repo = Arc::new(persistence.clone()) as Arc<dyn SubscriptionRepo>;
    let subscription_use_cases = Arc::new(
        SubscriptionUseCases::builder()
            .repo(subscription_repo)
            .build()?,
    );

    let sink = Arc::new(JsonLinesSink::new(config.export_path.clone()));
    tracing::info!(path = %sink.path().display(), "Export sink ready");

    let export_use_cases = SubscriptionExportUseCases::builder()
        .subscriptions(subscription_use_cases.clone())
        .sink(sink)
        .build()?;

    Ok((
        AppState {
            config: Arc::new(config),
            subscription_use_cases,
            export_use_cases: Arc::new(export_use_cases),
        },
        persistence,
    ))
}

pub fn init_tracing(log_file: Option<&Path>) -> Result<(), InfraError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "subscription_aggregator=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    // File (structured JSON logs), only when configured
    let json_layer = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                InfraError::ConfigInvalid(format!("cannot create log file {}: {e}", path.display()))
            })?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(true)
                    .with_span_list(true)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
    Ok(())
}

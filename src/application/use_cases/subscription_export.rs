use std::sync::Arc;

use tracing::instrument;

use crate::app_error::{AppError, AppResult, AppResultExt};
use crate::application::ports::subscription_sink::SubscriptionSink;
use crate::application::use_cases::subscription::SubscriptionUseCases;

/// Forwards stored subscriptions to a downstream sink.
///
/// Reads go through `SubscriptionUseCases`, so the composite-key identity
/// check applies here too.
#[derive(Clone)]
pub struct SubscriptionExportUseCases {
    subscriptions: Arc<SubscriptionUseCases>,
    sink: Arc<dyn SubscriptionSink>,
}

#[derive(Default)]
pub struct SubscriptionExportUseCasesBuilder {
    subscriptions: Option<Arc<SubscriptionUseCases>>,
    sink: Option<Arc<dyn SubscriptionSink>>,
}

impl SubscriptionExportUseCasesBuilder {
    pub fn subscriptions(mut self, subscriptions: Arc<SubscriptionUseCases>) -> Self {
        self.subscriptions = Some(subscriptions);
        self
    }

    pub fn sink(mut self, sink: Arc<dyn SubscriptionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn build(self) -> AppResult<SubscriptionExportUseCases> {
        let subscriptions = self
            .subscriptions
            .ok_or(AppError::NilDependency("subscription use cases"))?;
        let sink = self
            .sink
            .ok_or(AppError::NilDependency("subscription sink"))?;
        Ok(SubscriptionExportUseCases {
            subscriptions,
            sink,
        })
    }
}

impl SubscriptionExportUseCases {
    pub fn builder() -> SubscriptionExportUseCasesBuilder {
        SubscriptionExportUseCasesBuilder::default()
    }

    /// Export one subscription by composite key.
    #[instrument(skip(self))]
    pub async fn export_subscription(&self, user_id: &str, service_name: &str) -> AppResult<usize> {
        let subscription = self
            .subscriptions
            .get_subscription(user_id, service_name)
            .await?;

        self.sink
            .send(&subscription)
            .await
            .context("send subscription")?;

        Ok(1)
    }

    /// Export every subscription of a user. Stops at the first sink failure;
    /// records sent before it stay sent.
    #[instrument(skip(self))]
    pub async fn export_all(&self, user_id: &str) -> AppResult<usize> {
        let subscriptions = self.subscriptions.list_subscriptions(user_id).await?;

        for subscription in &subscriptions {
            self.sink
                .send(subscription)
                .await
                .context("send subscription")?;
        }

        tracing::info!(user_id, count = subscriptions.len(), "Subscriptions exported");
        Ok(subscriptions.len())
    }
}

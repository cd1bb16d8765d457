use async_trait::async_trait;

use crate::app_error::AppResult;
use crate::domain::entities::subscription::Subscription;

/// Downstream consumer of subscription records.
#[async_trait]
pub trait SubscriptionSink: Send + Sync {
    async fn send(&self, subscription: &Subscription) -> AppResult<()>;
}

//! In-memory mock implementations of the export sink.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::subscription_sink::SubscriptionSink,
    domain::entities::subscription::Subscription,
};

/// Records every subscription it receives. `failing()` rejects everything.
#[derive(Default)]
pub struct InMemorySink {
    sent: Mutex<Vec<Subscription>>,
    fail: bool,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Subscription> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl SubscriptionSink for InMemorySink {
    async fn send(&self, subscription: &Subscription) -> AppResult<()> {
        if self.fail {
            return Err(AppError::StorageUnavailable("sink closed".into()));
        }
        self.sent.lock().unwrap().push(subscription.clone());
        Ok(())
    }
}

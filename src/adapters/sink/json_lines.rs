use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};

use crate::{
    app_error::{AppError, AppResult},
    application::ports::subscription_sink::SubscriptionSink,
    domain::entities::subscription::Subscription,
};

/// Appends each subscription as one JSON object per line.
///
/// Writes are serialized so concurrent exports never interleave lines.
pub struct JsonLinesSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SubscriptionSink for JsonLinesSink {
    async fn send(&self, subscription: &Subscription) -> AppResult<()> {
        let mut line = serde_json::to_vec(subscription)
            .map_err(|e| AppError::InvalidInput(format!("unserializable subscription: {e}")))?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to open export file");
                AppError::StorageUnavailable(format!("open export file: {e}"))
            })?;

        file.write_all(&line)
            .await
            .map_err(|e| AppError::StorageUnavailable(format!("write export file: {e}")))?;
        file.flush()
            .await
            .map_err(|e| AppError::StorageUnavailable(format!("flush export file: {e}")))?;

        tracing::debug!(
            user_id = %subscription.user_id,
            service_name = %subscription.service_name,
            "Subscription exported"
        );
        Ok(())
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::app_error::{AppError, AppResult, AppResultExt};
use crate::application::validators::{validate_key_part, validate_price};
use crate::domain::entities::period::{Period, PeriodRange};
use crate::domain::entities::subscription::{Subscription, SubscriptionPatch};

// ============================================================================
// Repository Trait
// ============================================================================

/// Storage port for subscriptions, keyed by `(user_id, service_name)`.
///
/// Implementations are stateless gateways: uniqueness, atomic conditional
/// updates and row locking belong to the storage engine.
#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    /// Insert a new record. A duplicate key fails with `ConstraintViolation`.
    async fn create(&self, subscription: &Subscription) -> AppResult<Subscription>;

    async fn get(&self, user_id: &str, service_name: &str) -> AppResult<Subscription>;

    /// All records of a user. Order is not part of the contract.
    async fn list(&self, user_id: &str) -> AppResult<Vec<Subscription>>;

    /// COALESCE-style merge of `patch` into the stored row.
    /// Zero affected rows fails with `NotFound`.
    ///
    /// Period order is not checked here: the columns hold text, so a patch
    /// carrying only `end_date` is stored as given. Callers compare it against
    /// the current row first.
    async fn update(
        &self,
        user_id: &str,
        service_name: &str,
        patch: &SubscriptionPatch,
    ) -> AppResult<Subscription>;

    /// Hard delete, returning the removed record.
    async fn delete(&self, user_id: &str, service_name: &str) -> AppResult<Subscription>;

    /// Sum of `price` over records whose `start_date` lies in `range`.
    /// `end_date` does not bound the window. No match sums to 0.
    async fn total_cost_by_period(
        &self,
        user_id: &str,
        service_name: Option<&str>,
        range: &PeriodRange,
    ) -> AppResult<i64>;
}

// ============================================================================
// Input Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateSubscriptionInput {
    pub user_id: String,
    pub service_name: String,
    pub price: i32,
    pub start_date: String,
    pub end_date: Option<String>,
}

/// Partial update request. Each field is independently optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateSubscriptionInput {
    pub price: Option<i32>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// ============================================================================
// Use Cases
// ============================================================================

#[derive(Clone)]
pub struct SubscriptionUseCases {
    repo: Arc<dyn SubscriptionRepo>,
}

#[derive(Default)]
pub struct SubscriptionUseCasesBuilder {
    repo: Option<Arc<dyn SubscriptionRepo>>,
}

impl SubscriptionUseCasesBuilder {
    pub fn repo(mut self, repo: Arc<dyn SubscriptionRepo>) -> Self {
        self.repo = Some(repo);
        self
    }

    pub fn build(self) -> AppResult<SubscriptionUseCases> {
        let repo = self
            .repo
            .ok_or(AppError::NilDependency("subscription repository"))?;
        Ok(SubscriptionUseCases { repo })
    }
}

impl SubscriptionUseCases {
    pub fn builder() -> SubscriptionUseCasesBuilder {
        SubscriptionUseCasesBuilder::default()
    }

    #[instrument(skip(self))]
    pub async fn create_subscription(
        &self,
        input: CreateSubscriptionInput,
    ) -> AppResult<Subscription> {
        validate_key_part("user_id", &input.user_id)?;
        validate_key_part("service_name", &input.service_name)?;
        validate_price(input.price)?;

        let start_date: Period = input.start_date.parse()?;
        let end_date = input
            .end_date
            .as_deref()
            .map(str::parse::<Period>)
            .transpose()?;
        ensure_ordered(Some(start_date), end_date)?;

        let subscription = Subscription {
            user_id: input.user_id,
            service_name: input.service_name,
            price: input.price,
            start_date,
            end_date,
        };

        let created = self
            .repo
            .create(&subscription)
            .await
            .context("create subscription")?;

        tracing::info!(
            user_id = %created.user_id,
            service_name = %created.service_name,
            "Subscription created"
        );
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_subscription(
        &self,
        user_id: &str,
        service_name: &str,
    ) -> AppResult<Subscription> {
        validate_key_part("user_id", user_id)?;
        validate_key_part("service_name", service_name)?;

        let subscription = self
            .repo
            .get(user_id, service_name)
            .await
            .context("get subscription")?;
        ensure_identity(&subscription, user_id, service_name)?;

        Ok(subscription)
    }

    #[instrument(skip(self))]
    pub async fn list_subscriptions(&self, user_id: &str) -> AppResult<Vec<Subscription>> {
        validate_key_part("user_id", user_id)?;

        let subscriptions = self
            .repo
            .list(user_id)
            .await
            .context("list subscriptions")?;

        tracing::debug!(user_id, count = subscriptions.len(), "Subscriptions listed");
        Ok(subscriptions)
    }

    #[instrument(skip(self))]
    pub async fn update_subscription(
        &self,
        user_id: &str,
        service_name: &str,
        input: UpdateSubscriptionInput,
    ) -> AppResult<Subscription> {
        validate_key_part("user_id", user_id)?;
        validate_key_part("service_name", service_name)?;

        let patch = SubscriptionPatch {
            price: input.price,
            start_date: input
                .start_date
                .as_deref()
                .map(str::parse::<Period>)
                .transpose()?,
            end_date: input
                .end_date
                .as_deref()
                .map(str::parse::<Period>)
                .transpose()?,
        };
        if patch.is_empty() {
            return Err(AppError::InvalidInput(
                "at least one of price, start_date, end_date is required".into(),
            ));
        }
        if let Some(price) = patch.price {
            validate_price(price)?;
        }
        ensure_ordered(patch.start_date, patch.end_date)?;

        // Check identity and the merged period order before anything is written.
        let mut merged = self
            .repo
            .get(user_id, service_name)
            .await
            .context("update subscription")?;
        ensure_identity(&merged, user_id, service_name)?;
        merged.apply(&patch);
        ensure_ordered(Some(merged.start_date), merged.end_date)?;

        let updated = self
            .repo
            .update(user_id, service_name, &patch)
            .await
            .context("update subscription")?;
        ensure_identity(&updated, user_id, service_name)?;

        tracing::info!(user_id, service_name, "Subscription updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete_subscription(&self, user_id: &str, service_name: &str) -> AppResult<()> {
        validate_key_part("user_id", user_id)?;
        validate_key_part("service_name", service_name)?;

        let current = self
            .repo
            .get(user_id, service_name)
            .await
            .context("delete subscription")?;
        ensure_identity(&current, user_id, service_name)?;

        let removed = self
            .repo
            .delete(user_id, service_name)
            .await
            .context("delete subscription")?;
        ensure_identity(&removed, user_id, service_name)?;

        tracing::info!(user_id, service_name, "Subscription deleted");
        Ok(())
    }

    /// Total spend of a user over an inclusive month range.
    ///
    /// An empty or absent `service_name` means no service filter. Period
    /// strings are parsed before the repository is touched.
    #[instrument(skip(self))]
    pub async fn total_cost(
        &self,
        user_id: &str,
        service_name: Option<&str>,
        start_period: &str,
        end_period: &str,
    ) -> AppResult<i64> {
        let range = PeriodRange::parse(start_period, end_period)?;
        validate_key_part("user_id", user_id)?;
        let service_name = service_name.filter(|s| !s.is_empty());

        let total = self
            .repo
            .total_cost_by_period(user_id, service_name, &range)
            .await
            .context("compute total subscription cost")?;

        tracing::info!(user_id, ?service_name, total, "Total subscription cost computed");
        Ok(total)
    }
}

// ============================================================================
// Private Helpers
// ============================================================================

/// The stored record must carry the key the caller asked for.
fn ensure_identity(subscription: &Subscription, user_id: &str, service_name: &str) -> AppResult<()> {
    if !subscription.matches_key(user_id, service_name) {
        tracing::warn!(
            user_id,
            expected = service_name,
            actual = %subscription.service_name,
            "Service name mismatch for stored subscription"
        );
        return Err(AppError::NotFound);
    }
    Ok(())
}

fn ensure_ordered(start: Option<Period>, end: Option<Period>) -> AppResult<()> {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(AppError::InvalidInput(format!(
            "end_date {end} is before start_date {start}"
        )));
    }
    Ok(())
}

//! In-memory mock implementations of `SubscriptionRepo`.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::subscription::SubscriptionRepo,
    domain::entities::{
        period::PeriodRange,
        subscription::{Subscription, SubscriptionPatch},
    },
};

// ============================================================================
// InMemorySubscriptionRepo
// ============================================================================

/// Insertion-ordered store mirroring the Postgres adapter's semantics.
#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    pub subscriptions: Mutex<Vec<Subscription>>,
    total_cost_calls: AtomicUsize,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repo with initial subscriptions for testing.
    pub fn with_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        Self {
            subscriptions: Mutex::new(subscriptions),
            total_cost_calls: AtomicUsize::new(0),
        }
    }

    /// Get all subscriptions (for test assertions).
    pub fn get_all(&self) -> Vec<Subscription> {
        self.subscriptions.lock().unwrap().clone()
    }

    /// How many times the aggregation reached storage.
    pub fn total_cost_calls(&self) -> usize {
        self.total_cost_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriptionRepo for InMemorySubscriptionRepo {
    async fn create(&self, subscription: &Subscription) -> AppResult<Subscription> {
        let mut subscriptions = self.subscriptions.lock().unwrap();

        if subscriptions
            .iter()
            .any(|s| s.matches_key(&subscription.user_id, &subscription.service_name))
        {
            return Err(AppError::ConstraintViolation(
                "subscription already exists for this user and service".into(),
            ));
        }

        subscriptions.push(subscription.clone());
        Ok(subscription.clone())
    }

    async fn get(&self, user_id: &str, service_name: &str) -> AppResult<Subscription> {
        self.subscriptions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.matches_key(user_id, service_name))
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn list(&self, user_id: &str) -> AppResult<Vec<Subscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        user_id: &str,
        service_name: &str,
        patch: &SubscriptionPatch,
    ) -> AppResult<Subscription> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let subscription = subscriptions
            .iter_mut()
            .find(|s| s.matches_key(user_id, service_name))
            .ok_or(AppError::NotFound)?;

        subscription.apply(patch);
        Ok(subscription.clone())
    }

    async fn delete(&self, user_id: &str, service_name: &str) -> AppResult<Subscription> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let index = subscriptions
            .iter()
            .position(|s| s.matches_key(user_id, service_name))
            .ok_or(AppError::NotFound)?;
        Ok(subscriptions.remove(index))
    }

    async fn total_cost_by_period(
        &self,
        user_id: &str,
        service_name: Option<&str>,
        range: &PeriodRange,
    ) -> AppResult<i64> {
        self.total_cost_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter(|s| service_name.is_none_or(|name| s.service_name == name))
            .filter(|s| range.contains(s.start_date))
            .map(|s| i64::from(s.price))
            .sum())
    }
}

// ============================================================================
// MisroutingSubscriptionRepo
// ============================================================================

/// Keys records by user id alone and ignores the requested service name,
/// returning and mutating whatever it holds for the user. Used to exercise
/// the service's identity check.
pub struct MisroutingSubscriptionRepo {
    stored: Mutex<Option<Subscription>>,
    write_calls: AtomicUsize,
}

impl MisroutingSubscriptionRepo {
    pub fn new(stored: Subscription) -> Self {
        Self {
            stored: Mutex::new(Some(stored)),
            write_calls: AtomicUsize::new(0),
        }
    }

    /// Current row (for test assertions).
    pub fn stored(&self) -> Option<Subscription> {
        self.stored.lock().unwrap().clone()
    }

    /// How many update/delete calls reached the repo.
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, user_id: &str) -> AppResult<Subscription> {
        self.stored
            .lock()
            .unwrap()
            .clone()
            .filter(|s| s.user_id == user_id)
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl SubscriptionRepo for MisroutingSubscriptionRepo {
    async fn create(&self, subscription: &Subscription) -> AppResult<Subscription> {
        Ok(subscription.clone())
    }

    async fn get(&self, user_id: &str, _service_name: &str) -> AppResult<Subscription> {
        self.lookup(user_id)
    }

    async fn list(&self, user_id: &str) -> AppResult<Vec<Subscription>> {
        Ok(self.lookup(user_id).into_iter().collect())
    }

    async fn update(
        &self,
        user_id: &str,
        _service_name: &str,
        patch: &SubscriptionPatch,
    ) -> AppResult<Subscription> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let mut stored = self.stored.lock().unwrap();
        let subscription = stored
            .as_mut()
            .filter(|s| s.user_id == user_id)
            .ok_or(AppError::NotFound)?;
        subscription.apply(patch);
        Ok(subscription.clone())
    }

    async fn delete(&self, user_id: &str, _service_name: &str) -> AppResult<Subscription> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let mut stored = self.stored.lock().unwrap();
        if stored.as_ref().is_some_and(|s| s.user_id == user_id) {
            stored.take().ok_or(AppError::NotFound)
        } else {
            Err(AppError::NotFound)
        }
    }

    async fn total_cost_by_period(
        &self,
        _user_id: &str,
        _service_name: Option<&str>,
        _range: &PeriodRange,
    ) -> AppResult<i64> {
        Ok(0)
    }
}

// ============================================================================
// FailingSubscriptionRepo
// ============================================================================

/// Every call fails as if the database were unreachable.
#[derive(Default)]
pub struct FailingSubscriptionRepo;

fn unavailable(op: &str) -> AppError {
    AppError::StorageUnavailable(format!("{op}: connection refused"))
}

#[async_trait]
impl SubscriptionRepo for FailingSubscriptionRepo {
    async fn create(&self, _subscription: &Subscription) -> AppResult<Subscription> {
        Err(unavailable("create"))
    }

    async fn get(&self, _user_id: &str, _service_name: &str) -> AppResult<Subscription> {
        Err(unavailable("get"))
    }

    async fn list(&self, _user_id: &str) -> AppResult<Vec<Subscription>> {
        Err(unavailable("list"))
    }

    async fn update(
        &self,
        _user_id: &str,
        _service_name: &str,
        _patch: &SubscriptionPatch,
    ) -> AppResult<Subscription> {
        Err(unavailable("update"))
    }

    async fn delete(&self, _user_id: &str, _service_name: &str) -> AppResult<Subscription> {
        Err(unavailable("delete"))
    }

    async fn total_cost_by_period(
        &self,
        _user_id: &str,
        _service_name: Option<&str>,
        _range: &PeriodRange,
    ) -> AppResult<i64> {
        Err(unavailable("total_cost_by_period"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_subscription;

    #[tokio::test]
    async fn test_duplicate_key_fails() {
        let repo = InMemorySubscriptionRepo::new();
        let sub = create_test_subscription(|_| {});

        repo.create(&sub).await.unwrap();
        let result = repo.create(&sub).await;

        assert!(matches!(result, Err(AppError::ConstraintViolation(_))));
    }

    #[tokio::test]
    async fn test_same_service_different_users() {
        let repo = InMemorySubscriptionRepo::new();
        repo.create(&create_test_subscription(|_| {})).await.unwrap();
        repo.create(&create_test_subscription(|s| s.user_id = "other".into()))
            .await
            .unwrap();

        assert_eq!(repo.get_all().len(), 2);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let repo = InMemorySubscriptionRepo::new();
        for name in ["c", "a", "b"] {
            repo.create(&create_test_subscription(|s| s.service_name = name.into()))
                .await
                .unwrap();
        }

        let names: Vec<String> = repo
            .list(crate::test_utils::TEST_USER_ID)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.service_name)
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_misrouting_repo_writes_user_row() {
        let stored = create_test_subscription(|s| s.service_name = "Spotify".into());
        let repo = MisroutingSubscriptionRepo::new(stored);
        let patch = SubscriptionPatch {
            price: Some(1),
            ..Default::default()
        };

        let updated = repo
            .update(crate::test_utils::TEST_USER_ID, "Netflix", &patch)
            .await
            .unwrap();
        assert_eq!(updated.service_name, "Spotify");
        assert_eq!(repo.stored().unwrap().price, 1);

        repo.delete(crate::test_utils::TEST_USER_ID, "Netflix")
            .await
            .unwrap();
        assert!(repo.stored().is_none());
        assert_eq!(repo.write_calls(), 2);
    }
}

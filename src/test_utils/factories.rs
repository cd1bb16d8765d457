//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use crate::domain::entities::subscription::Subscription;

pub const TEST_USER_ID: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";

/// Create a test subscription with sensible defaults.
pub fn create_test_subscription(overrides: impl FnOnce(&mut Subscription)) -> Subscription {
    let mut subscription = Subscription {
        user_id: TEST_USER_ID.to_string(),
        service_name: "Yandex Plus".to_string(),
        price: 400,
        start_date: "07-2025".parse().expect("valid period"),
        end_date: None,
    };
    overrides(&mut subscription);
    subscription
}

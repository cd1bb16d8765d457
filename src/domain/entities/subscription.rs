use serde::{Deserialize, Serialize};

use super::period::Period;

/// One user's subscription to a named service.
///
/// `(user_id, service_name)` is the composite key: at most one live record
/// exists per pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: String,
    pub service_name: String,
    /// Minor currency units.
    pub price: i32,
    pub start_date: Period,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Period>,
}

impl Subscription {
    pub fn matches_key(&self, user_id: &str, service_name: &str) -> bool {
        self.user_id == user_id && self.service_name == service_name
    }

    /// Apply a partial update in place. Absent fields keep their value.
    pub fn apply(&mut self, patch: &SubscriptionPatch) {
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = Some(end_date);
        }
    }
}

/// Fields of a partial update. `None` means "leave unchanged".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubscriptionPatch {
    pub price: Option<i32>,
    pub start_date: Option<Period>,
    pub end_date: Option<Period>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self.price.is_none() && self.start_date.is_none() && self.end_date.is_none()
    }
}

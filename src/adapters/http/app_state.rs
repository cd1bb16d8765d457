use std::sync::Arc;

use crate::{
    application::use_cases::{
        subscription::SubscriptionUseCases, subscription_export::SubscriptionExportUseCases,
    },
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub subscription_use_cases: Arc<SubscriptionUseCases>,
    pub export_use_cases: Arc<SubscriptionExportUseCases>,
}

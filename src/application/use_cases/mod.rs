pub mod subscription;
pub mod subscription_export;

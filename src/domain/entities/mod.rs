pub mod period;
pub mod subscription;

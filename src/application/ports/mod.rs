pub mod subscription_sink;

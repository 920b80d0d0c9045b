mod app_config;
mod timeouts;

pub use app_config::{AppConfig, LeetCodeConfig, SchedulerConfig, ServerConfig};
pub use timeouts::TimeoutConfig;

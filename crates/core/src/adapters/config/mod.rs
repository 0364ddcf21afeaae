pub mod app_config;
pub mod funkit_config;
pub mod swap_config;

pub use app_config::{AppConfig, ConfigError};

//! CLI module containing argument parsing, config file loading and validation

pub mod args;
pub mod config;
mod error;
mod settings;

pub use args::Args;
pub use config::default_config_path;
pub use error::{ConfigError, ConfigResult};
pub use settings::{
    LoggingSettings, Settings, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_METRICS_HOST,
    DEFAULT_METRICS_PORT, DEFAULT_REDIS_URL,
};

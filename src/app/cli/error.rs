//! Configuration error types

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("{message}")]
    NotFound { path: PathBuf, message: String },

    #[error("Cannot read configuration file {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("Cannot parse configuration file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

impl ConfigError {
    pub fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

impl crate::core::error_handling::ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ConfigError::InvalidValue { .. } => true, // User can fix the value
            ConfigError::NotFound { .. } => true,     // User named a missing file
            ConfigError::Read { .. } => false,
            ConfigError::Parse { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidValue { message, .. } | ConfigError::NotFound { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

use crate::app::cli::ConfigError;
use crate::core::error_handling::ContextualError;
use crate::pipeline::PipelineError;
use crate::queue::QueueError;
use thiserror::Error;

/// Anything that stops the binary from finishing a run
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Config(e) => e.is_user_actionable(),
            AppError::Queue(e) => e.is_user_actionable(),
            AppError::Pipeline(e) => e.is_user_actionable(),
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Queue(e) => e.user_message(),
            AppError::Pipeline(e) => e.user_message(),
        }
    }
}

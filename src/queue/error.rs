//! Queue Error Types

/// Errors raised by a queue backend
///
/// Every variant is fatal for the pipeline run that hit it: a queue that can
/// no longer be read would otherwise look exactly like an empty one.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Queue connection to {target} failed: {message}")]
    Connection { target: String, message: String },

    #[error("Queue command on '{queue_id}' failed: {message}")]
    Command { queue_id: String, message: String },

    #[error("Queue internal error: {message}")]
    Internal { message: String },
}

impl crate::core::error_handling::ContextualError for QueueError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

//! Delivery error types

/// Failure to deliver one gauge line
///
/// Always scoped to a single line; sibling deliveries are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("cannot connect to metrics endpoint {endpoint} for '{line}': {message}")]
    Connection {
        endpoint: String,
        line: String,
        message: String,
    },

    #[error("writing '{line}' to {endpoint} failed: {message}")]
    Write {
        endpoint: String,
        line: String,
        message: String,
    },

    #[error("delivery task for '{line}' did not complete: {message}")]
    Task { line: String, message: String },
}

impl DeliveryError {
    /// The gauge line (without newline) this error belongs to
    pub fn line(&self) -> &str {
        match self {
            DeliveryError::Connection { line, .. }
            | DeliveryError::Write { line, .. }
            | DeliveryError::Task { line, .. } => line,
        }
    }
}

impl crate::core::error_handling::ContextualError for DeliveryError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

pub type DeliveryResult<T> = Result<T, DeliveryError>;

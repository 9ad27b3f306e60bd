//! Generic error handling utilities
//!
//! Provides one way of reporting fatal errors regardless of which module
//! raised them, while letting each error decide how much to tell the user.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// User-actionable errors (a bad metric key in the config file, an unknown
/// strategy name) are reported with their own message. System errors (the
/// queue server refusing connections) are reported with the operation context
/// and their details go to the debug log.
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`; otherwise it returns `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if the message can be shown directly to the user
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message for user-actionable errors
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// # Examples
/// ```rust,no_run
/// # use lightsync::core::error_handling::log_error_with_context;
/// # use lightsync::app::cli::ConfigError;
/// let err = ConfigError::InvalidValue {
///     key: "metrics-port".to_string(),
///     message: "port must be greater than 0".to_string(),
/// };
/// log_error_with_context(&err, "Configuration loading");
/// // Logs: "FATAL: port must be greater than 0"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message() {
        Some(user_msg) if error.is_user_actionable() => log::error!("FATAL: {}", user_msg),
        _ => log::error!("FATAL: {}: {}", operation_context, error),
    }
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

//! Generic error handling utilities
//!
//! Distinguishes user-actionable errors (show the specific message) from
//! system errors (show generic context, keep detail at debug level) so fatal
//! reporting stays consistent across the crate.

/// Trait for errors that can classify themselves for reporting
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)` with an actionable message; when it returns `false`,
/// `user_message()` should return `None`.
pub trait ContextualError: std::error::Error {
    /// True if this error carries a specific message the user can act on,
    /// such as a bad configuration value or an unreadable input file.
    fn is_user_actionable(&self) -> bool;

    /// The actionable message, when there is one.
    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error with detail appropriate to its classification.
///
/// User-actionable errors log their own message; system errors log the
/// operation context. Full detail always lands at debug level.
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    if error.is_user_actionable() {
        if let Some(user_message) = error.user_message() {
            log::error!("FATAL: {}", user_message);
        } else {
            log::error!("FATAL: {}", operation_context);
        }
    } else {
        log::error!("FATAL: {}", operation_context);
    }
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

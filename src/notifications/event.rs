//! Event types for the notification channel

use std::time::SystemTime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    /// User-visible warning, shown once per failure
    Warning,
    /// Unexpected failure forwarded to the exception-report channel
    ExceptionReport,
}

/// One notification published by the scan pipeline
#[derive(Clone, Debug)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub message: String,
    pub timestamp: SystemTime,
}

impl NotificationEvent {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            message: message.into(),
            timestamp: SystemTime::now(),
        }
    }

    pub fn exception(error: &(dyn std::error::Error + Send + Sync)) -> Self {
        Self {
            kind: NotificationKind::ExceptionReport,
            message: error.to_string(),
            timestamp: SystemTime::now(),
        }
    }
}

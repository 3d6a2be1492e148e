//! Scan Error Types
//!
//! The taxonomy the façade classifies failures into. Every variant resolves
//! to an empty result for the caller; the variants differ only in the side
//! effect (log level, user warning, exception report).

use crate::checker::runner::ProcessFailure;
use crate::scan::scannable::PrepareError;
use std::fmt;

/// Scan failure classification
#[derive(Debug, Clone)]
pub enum ScanError {
    /// The caller's cancellation signal was observed mid-pipeline
    Cancelled,
    /// Buffer content could not be read or understood at the prepare stage
    Parse { message: String },
    /// Scratch file or process launch I/O failed
    Io { message: String },
    /// The checker crashed or produced output we cannot account for
    Checker { message: String },
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::Cancelled => write!(f, "scan cancelled"),
            ScanError::Parse { message } => write!(f, "unscannable buffer content: {}", message),
            ScanError::Io { message } => write!(f, "I/O error: {}", message),
            ScanError::Checker { message } => write!(f, "checker failure: {}", message),
        }
    }
}

impl std::error::Error for ScanError {}

impl crate::core::error_handling::ContextualError for ScanError {
    fn is_user_actionable(&self) -> bool {
        match self {
            // Disk-full or permission problems are something the user can fix
            ScanError::Io { .. } => true,
            ScanError::Cancelled | ScanError::Parse { .. } | ScanError::Checker { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ScanError::Io { message } => Some(message),
            _ => None,
        }
    }
}

impl From<PrepareError> for ScanError {
    fn from(error: PrepareError) -> Self {
        match error {
            PrepareError::Unscannable { .. } => ScanError::Parse {
                message: error.to_string(),
            },
            PrepareError::Scratch { .. } => ScanError::Io {
                message: error.to_string(),
            },
        }
    }
}

impl From<ProcessFailure> for ScanError {
    fn from(failure: ProcessFailure) -> Self {
        match failure {
            ProcessFailure::Spawn { .. } => ScanError::Io {
                message: failure.to_string(),
            },
            ProcessFailure::NonUtf8Output | ProcessFailure::Crashed { .. } => ScanError::Checker {
                message: failure.to_string(),
            },
        }
    }
}

pub type ScanResult<T> = Result<T, ScanError>;

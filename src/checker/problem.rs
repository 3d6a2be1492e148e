//! Problem entities built from checker output
//!
//! A `Problem` is one diagnostic anchored to a position in a buffer. Problems
//! are created exclusively by the output parser, are immutable afterwards,
//! and never outlive the scan request that produced them.

use crate::buffer::BufferId;
use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Position reference into a specific buffer's text
///
/// Anchors carry a byte offset into the scan-time content rather than a raw
/// line/column pair, so the UI can re-highlight correctly after minor edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Anchor {
    pub buffer: BufferId,
    pub offset: usize,
}

/// Severity as reported by the checker
///
/// The three-way kind is preserved for filtering logic even though NOTE and
/// WARNING collapse to the same highlight in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SeverityLevel {
    Error,
    Warning,
    Note,
}

/// UI-facing highlight severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HighlightKind {
    Error,
    Warning,
}

impl SeverityLevel {
    /// Collapse to the UI severity space.
    ///
    /// NOTE renders as WARNING; a weaker highlight would be too easy to miss.
    pub fn highlight(self) -> HighlightKind {
        match self {
            SeverityLevel::Error => HighlightKind::Error,
            SeverityLevel::Warning | SeverityLevel::Note => HighlightKind::Warning,
        }
    }
}

/// One diagnostic reported by the checker
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Problem {
    anchor: Anchor,
    severity: SeverityLevel,
    line: u32,
    column: u32,
    message: String,
    after_end_of_line: bool,
    suppress_errors: bool,
}

impl Problem {
    pub(crate) fn new(
        anchor: Anchor,
        severity: SeverityLevel,
        line: u32,
        column: u32,
        message: String,
        after_end_of_line: bool,
        suppress_errors: bool,
    ) -> Self {
        Self {
            anchor,
            severity,
            line,
            column,
            message,
            after_end_of_line,
            suppress_errors,
        }
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn severity(&self) -> SeverityLevel {
        self.severity
    }

    pub fn highlight(&self) -> HighlightKind {
        self.severity.highlight()
    }

    /// 1-based line as reported by the checker.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 1-based column as reported by the checker.
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Raw message text from the checker.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Render as trailing rather than ranged.
    pub fn is_after_end_of_line(&self) -> bool {
        self.after_end_of_line
    }

    /// Soft diagnostic that must not escalate a CI-style failure.
    pub fn suppresses_errors(&self) -> bool {
        self.suppress_errors
    }
}

//! mypy-bridge: editor-side scan orchestration for the mypy type checker
//!
//! Runs mypy against open buffers, converts its textual diagnostics into
//! position-anchored `Problem`s, and delivers them to a UI layer — tolerating
//! process failures, unsaved buffers, timeouts, and cancellation, without
//! blocking the caller.

pub mod annotate;
pub mod app;
pub mod buffer;
pub mod checker;
pub mod common;
pub mod core;
pub mod notifications;
pub mod scan;

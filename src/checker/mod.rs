//! Checker Integration
//!
//! Everything that faces the external mypy process: configuration, the
//! process boundary, the diagnostic output parser, and the `Problem` entities
//! it builds. The checker itself is an opaque text-in/text-out black box.

pub mod config;
pub mod parser;
pub mod problem;
pub mod runner;

pub use config::{CheckerConfig, ConfigError};
pub use problem::{Anchor, HighlightKind, Problem, SeverityLevel};
pub use runner::{MypyRunner, ProcessFailure, ProcessRunner};

//! Test modules for the scan pipeline
//!
//! Unit suites for the coordinator and the async façade, plus shared
//! helpers. Integration-level scenarios live in the top-level `tests/`
//! directory and run against the public API.

pub mod coordinator;
pub mod helpers;

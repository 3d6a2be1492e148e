//! Shared infrastructure used by both the library and the CLI

pub mod logging;

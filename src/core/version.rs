//! Version accessors for the CLI banner and log lines.

/// Crate version from the manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Human-readable version banner.
pub fn version_string() -> String {
    format!("mypy-bridge {}", VERSION)
}

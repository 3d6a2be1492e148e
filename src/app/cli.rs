//! CLI argument surface for the headless batch scanner

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "mypy-bridge")]
#[command(about = "Run mypy against Python sources and report structured diagnostics")]
#[command(version)]
pub struct Args {
    /// Python files to scan
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Mypy executable override
    #[arg(long = "mypy", value_name = "PATH")]
    pub mypy: Option<PathBuf>,

    /// Checker wait timeout in seconds
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Report output format
    #[arg(short = 'F', long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "json"])]
    pub log_format: Option<String>,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

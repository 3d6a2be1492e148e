//! Checker configuration
//!
//! `CheckerConfig` describes how to invoke mypy: which executable, which
//! arguments, how long the façade waits for a result, and where scratch
//! copies of unsaved buffers are materialized. Values come from a TOML file
//! discovered through the usual chain, with CLI flags layered on top by the
//! front-end.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "MYPY_BRIDGE_CONFIG";

const CONFIG_DIR: &str = "mypy-bridge";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Checker executable: a bare name resolved on PATH or a full path.
    pub executable: PathBuf,
    /// Arguments passed before the file list.
    pub arguments: Vec<String>,
    /// Upper bound on the façade's wait for one scan, in seconds.
    pub timeout_secs: u64,
    /// Root for materialized scratch copies; system temp dir when unset.
    pub scratch_dir: Option<PathBuf>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("mypy"),
            arguments: vec![
                "--show-column-numbers".to_string(),
                "--no-error-summary".to_string(),
                "--no-pretty".to_string(),
            ],
            timeout_secs: 30,
            scratch_dir: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl CheckerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Root directory for this process's scratch copies.
    pub fn scratch_root(&self) -> PathBuf {
        self.scratch_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(CONFIG_DIR))
    }

    /// Load configuration through the discovery chain.
    ///
    /// Explicit path, then `MYPY_BRIDGE_CONFIG`, then the per-user config
    /// directory. A missing file is only an error when it was named
    /// explicitly; an absent default file yields the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        if let Some(dir) = dirs::config_dir() {
            let path = dir.join(CONFIG_DIR).join(CONFIG_FILE);
            if path.is_file() {
                return Self::from_file(&path);
            }
        }
        log::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: CheckerConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

//! Checker process boundary
//!
//! `ProcessRunner` is the seam between the scan pipeline and the external
//! checker: a cheap availability probe and a single blocking invocation per
//! batch. `MypyRunner` is the real subprocess implementation; tests substitute
//! scripted runners. A failed invocation is never retried here — the
//! coordinator classifies the failure and the façade absorbs it.

use crate::checker::config::CheckerConfig;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, thiserror::Error)]
pub enum ProcessFailure {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("checker produced non-UTF-8 output")]
    NonUtf8Output,

    #[error("checker exited abnormally ({status}): {stderr}")]
    Crashed { status: String, stderr: String },
}

/// Boundary consumed by the scan coordinator
pub trait ProcessRunner: Send + Sync {
    /// Cheap precondition check, safe to call on every inspection request.
    fn is_available(&self) -> bool;

    /// Run the checker once against the whole file set and return raw stdout.
    ///
    /// Blocking; may take seconds. Callers dispatch this off the UI thread.
    fn invoke(&self, files: &[PathBuf]) -> Result<String, ProcessFailure>;
}

/// Real mypy subprocess invocation
#[derive(Debug, Clone)]
pub struct MypyRunner {
    config: CheckerConfig,
}

impl MypyRunner {
    pub fn new(config: CheckerConfig) -> Self {
        Self { config }
    }

    fn resolve_on_path(executable: &Path) -> bool {
        match std::env::var_os("PATH") {
            Some(paths) => {
                std::env::split_paths(&paths).any(|dir| dir.join(executable).is_file())
            }
            None => false,
        }
    }
}

impl ProcessRunner for MypyRunner {
    fn is_available(&self) -> bool {
        let executable = &self.config.executable;
        if executable.components().count() > 1 {
            executable.is_file()
        } else {
            Self::resolve_on_path(executable)
        }
    }

    fn invoke(&self, files: &[PathBuf]) -> Result<String, ProcessFailure> {
        let executable = &self.config.executable;
        log::debug!(
            "invoking {} with {} argument(s) on {} file(s)",
            executable.display(),
            self.config.arguments.len(),
            files.len()
        );

        let output = Command::new(executable)
            .args(&self.config.arguments)
            .args(files)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProcessFailure::Spawn {
                command: executable.display().to_string(),
                source,
            })?;

        // mypy exits 0 when clean and 1 when it reported diagnostics; both
        // are normal outcomes. Anything else is a crash.
        match output.status.code() {
            Some(0) | Some(1) => {}
            Some(code) => {
                return Err(ProcessFailure::Crashed {
                    status: code.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                })
            }
            None => {
                return Err(ProcessFailure::Crashed {
                    status: "killed by signal".to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                })
            }
        }

        String::from_utf8(output.stdout).map_err(|_| ProcessFailure::NonUtf8Output)
    }
}

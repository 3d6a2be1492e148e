//! Shared helpers for integration tests
//!
//! Integration tests exercise the crate only through its public API, with a
//! scripted runner standing in for the mypy process.
#![allow(dead_code)] // not every test binary uses every helper

use mypy_bridge::buffer::{BufferId, BufferStore};
use mypy_bridge::checker::config::CheckerConfig;
use mypy_bridge::checker::runner::{ProcessFailure, ProcessRunner};
use mypy_bridge::notifications::event::NotificationEvent;
use mypy_bridge::notifications::notifier::ChannelNotifier;
use mypy_bridge::scan::facade::{CheckerContext, InspectionService};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

/// Scripted checker: emits a configured output, or fails once.
pub struct ScriptedRunner {
    available: bool,
    per_file_suffix: Option<String>,
    raw_output: String,
    failure: Mutex<Option<ProcessFailure>>,
    invocations: AtomicUsize,
}

impl ScriptedRunner {
    fn base() -> Self {
        Self {
            available: true,
            per_file_suffix: None,
            raw_output: String::new(),
            failure: Mutex::new(None),
            invocations: AtomicUsize::new(0),
        }
    }

    pub fn clean() -> Self {
        Self::base()
    }

    pub fn per_file(suffix: &str) -> Self {
        Self {
            per_file_suffix: Some(suffix.to_string()),
            ..Self::base()
        }
    }

    pub fn raw(output: &str) -> Self {
        Self {
            raw_output: output.to_string(),
            ..Self::base()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::base()
        }
    }

    pub fn failing(failure: ProcessFailure) -> Self {
        Self {
            failure: Mutex::new(Some(failure)),
            ..Self::base()
        }
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl ProcessRunner for ScriptedRunner {
    fn is_available(&self) -> bool {
        self.available
    }

    fn invoke(&self, files: &[PathBuf]) -> Result<String, ProcessFailure> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failure.lock().unwrap().take() {
            return Err(failure);
        }
        if let Some(suffix) = &self.per_file_suffix {
            return Ok(files
                .iter()
                .map(|file| format!("{}:{}\n", file.display(), suffix))
                .collect());
        }
        Ok(self.raw_output.clone())
    }
}

/// One editing session under test: work dir, scratch root, buffer store.
pub struct Session {
    pub work: TempDir,
    pub scratch: TempDir,
    pub store: Arc<BufferStore>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            work: TempDir::new().unwrap(),
            scratch: TempDir::new().unwrap(),
            store: Arc::new(BufferStore::new()),
        }
    }

    pub fn saved_buffer(&self, name: &str, content: &str) -> BufferId {
        let path = self.work.path().join(name);
        std::fs::write(&path, content).unwrap();
        self.store.open(path, content)
    }

    pub fn dirty_buffer(&self, name: &str, content: &str) -> BufferId {
        let path = self.work.path().join(name);
        std::fs::write(&path, "# stale\n").unwrap();
        let id = self.store.open(path, "# stale\n");
        self.store.edit(id, content);
        id
    }

    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch.path())
            .map(|dir| dir.count())
            .unwrap_or(0)
    }

    pub fn service(
        &self,
        runner: Arc<dyn ProcessRunner>,
    ) -> (InspectionService, UnboundedReceiver<NotificationEvent>) {
        let config = CheckerConfig {
            scratch_dir: Some(self.scratch.path().to_path_buf()),
            ..CheckerConfig::default()
        };
        let (notifier, notifications) = ChannelNotifier::channel();
        let ctx = CheckerContext::new(config, runner, self.store.clone(), notifier);
        (InspectionService::new(ctx), notifications)
    }
}

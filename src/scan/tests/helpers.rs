//! Test helpers for scan unit tests
//!
//! These helpers are separate from the integration helpers in tests/common/
//! since unit tests and integration tests run in different contexts.

use crate::buffer::{BufferId, BufferStore};
use crate::checker::config::CheckerConfig;
use crate::checker::runner::{ProcessFailure, ProcessRunner};
use crate::notifications::event::NotificationEvent;
use crate::notifications::notifier::ChannelNotifier;
use crate::scan::facade::{CheckerContext, InspectionService};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;

/// Scripted stand-in for the checker process
pub struct StubRunner {
    available: bool,
    per_file_suffix: Option<String>,
    raw_output: String,
    failure: Mutex<Option<ProcessFailure>>,
    delay: Option<Duration>,
    invocations: AtomicUsize,
}

impl StubRunner {
    fn base() -> Self {
        Self {
            available: true,
            per_file_suffix: None,
            raw_output: String::new(),
            failure: Mutex::new(None),
            delay: None,
            invocations: AtomicUsize::new(0),
        }
    }

    /// Checker that reports nothing.
    pub fn clean() -> Self {
        Self::base()
    }

    /// Checker that emits `<path>:<suffix>` for every file in the batch.
    pub fn per_file(suffix: &str) -> Self {
        Self {
            per_file_suffix: Some(suffix.to_string()),
            ..Self::base()
        }
    }

    /// Checker that emits a fixed raw output regardless of input.
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

    /// Checker whose first invocation fails with the given failure.
    pub fn failing(failure: ProcessFailure) -> Self {
        Self {
            failure: Mutex::new(Some(failure)),
            ..Self::base()
        }
    }

    /// Delay every invocation, for timeout and supersession tests.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl ProcessRunner for StubRunner {
    fn is_available(&self) -> bool {
        self.available
    }

    fn invoke(&self, files: &[PathBuf]) -> Result<String, ProcessFailure> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
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

/// On-disk fixture: a work directory for saved buffers and a scratch root
/// whose emptiness proves the disposal invariant.
pub struct ScanFixture {
    pub work: TempDir,
    pub scratch: TempDir,
    pub store: Arc<BufferStore>,
}

impl ScanFixture {
    pub fn new() -> Self {
        Self {
            work: TempDir::new().unwrap(),
            scratch: TempDir::new().unwrap(),
            store: Arc::new(BufferStore::new()),
        }
    }

    pub fn config(&self) -> CheckerConfig {
        CheckerConfig {
            scratch_dir: Some(self.scratch.path().to_path_buf()),
            ..CheckerConfig::default()
        }
    }

    /// Open a clean buffer whose content is on disk.
    pub fn saved_buffer(&self, name: &str, content: &str) -> BufferId {
        let path = self.work.path().join(name);
        std::fs::write(&path, content).unwrap();
        self.store.open(path, content)
    }

    /// Open a modified-and-unsaved buffer; its on-disk twin stays stale.
    pub fn dirty_buffer(&self, name: &str, content: &str) -> BufferId {
        let path = self.work.path().join(name);
        std::fs::write(&path, "# stale on-disk content\n").unwrap();
        let id = self.store.open(path, "# stale on-disk content\n");
        self.store.edit(id, content);
        id
    }

    /// Number of entries left under the scratch root; zero after a scan
    /// means every disposal obligation ran.
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(self.scratch.path())
            .map(|dir| dir.count())
            .unwrap_or(0)
    }

    /// Build a service around the given runner, with a channel notifier so
    /// tests can assert on emitted notifications.
    pub fn service(
        &self,
        runner: Arc<dyn ProcessRunner>,
    ) -> (InspectionService, UnboundedReceiver<NotificationEvent>) {
        self.service_with_config(runner, self.config())
    }

    pub fn service_with_config(
        &self,
        runner: Arc<dyn ProcessRunner>,
        config: CheckerConfig,
    ) -> (InspectionService, UnboundedReceiver<NotificationEvent>) {
        let (notifier, notifications) = ChannelNotifier::channel();
        let ctx = CheckerContext::new(config, runner, self.store.clone(), notifier);
        (InspectionService::new(ctx), notifications)
    }
}

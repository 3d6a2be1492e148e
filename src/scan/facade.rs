//! Async inspection façade
//!
//! The entry point the editor's inspection/annotation machinery calls. The
//! blocking checker run is handed off to the worker pool; the caller suspends
//! only while waiting for the result, bounded by the configured timeout and
//! interruptible by the request's cancellation token. Every failure is
//! absorbed into an empty result plus a classified side effect — the façade
//! never fails to its caller. Disposal of scratch files is owned by the
//! worker itself, so it runs even when the wait is abandoned.

use crate::buffer::{BufferId, BufferSnapshot, BufferStore};
use crate::checker::config::CheckerConfig;
use crate::checker::problem::Problem;
use crate::checker::runner::ProcessRunner;
use crate::core::cancel::CancellationToken;
use crate::notifications::notifier::Notifier;
use crate::scan::coordinator::ScanJob;
use crate::scan::error::{ScanError, ScanResult};
use crate::scan::request::request_id;
use crate::scan::scannable::prepare;
use std::collections::HashMap;
use std::sync::Arc;

/// Everything one editing session needs to run scans
///
/// Threaded explicitly into the pipeline instead of living in a global
/// registry; lifecycle belongs to whoever composes the session.
#[derive(Clone)]
pub struct CheckerContext {
    pub config: CheckerConfig,
    pub runner: Arc<dyn ProcessRunner>,
    pub store: Arc<BufferStore>,
    pub notifier: Arc<dyn Notifier>,
}

impl CheckerContext {
    pub fn new(
        config: CheckerConfig,
        runner: Arc<dyn ProcessRunner>,
        store: Arc<BufferStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            runner,
            store,
            notifier,
        }
    }
}

/// Never-failing inspection entry point over the scan pipeline
#[derive(Clone)]
pub struct InspectionService {
    ctx: CheckerContext,
}

impl InspectionService {
    pub fn new(ctx: CheckerContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &CheckerContext {
        &self.ctx
    }

    /// Inspect a single buffer.
    ///
    /// An absent entry in the batch result and an empty problem list are the
    /// same thing to callers, so this flattens both to an empty vector.
    pub async fn inspect(&self, buffer: BufferId, cancel: &CancellationToken) -> Vec<Problem> {
        self.scan(&[buffer], cancel)
            .await
            .remove(&buffer)
            .unwrap_or_default()
    }

    /// Run one batched scan over the given buffers.
    ///
    /// Never fails: availability misses, cancellations, timeouts, and every
    /// error class resolve to an empty mapping plus the side effect mandated
    /// for that class.
    pub async fn scan(
        &self,
        buffers: &[BufferId],
        cancel: &CancellationToken,
    ) -> HashMap<BufferId, Vec<Problem>> {
        if !self.ctx.runner.is_available() {
            log::debug!("scan skipped: checker not available");
            return HashMap::new();
        }

        let snapshots = self.ctx.store.snapshot(buffers);
        if snapshots.is_empty() {
            return HashMap::new();
        }

        let worker_ctx = self.ctx.clone();
        let worker_cancel = cancel.clone();
        let mut worker =
            tokio::task::spawn_blocking(move || scan_blocking(&worker_ctx, snapshots, &worker_cancel));

        let joined = tokio::select! {
            joined = &mut worker => joined,
            _ = cancel.cancelled() => {
                log::debug!("scan cancelled while waiting for the checker");
                return HashMap::new();
            }
            _ = tokio::time::sleep(self.ctx.config.timeout()) => {
                // The checker process is not killed here; the abandoned
                // worker still disposes its scratch files when it returns.
                log::debug!(
                    "scan wait timed out after {:?}; the checker may still be running",
                    self.ctx.config.timeout()
                );
                return HashMap::new();
            }
        };

        match joined {
            Ok(Ok(results)) => self.deliver(results),
            Ok(Err(error)) => {
                self.classify_failure(error).await;
                HashMap::new()
            }
            Err(join_error) => {
                log::warn!("scan worker died: {}", join_error);
                self.ctx
                    .notifier
                    .report_exception(&ScanError::Checker {
                        message: join_error.to_string(),
                    })
                    .await;
                HashMap::new()
            }
        }
    }

    /// Drop problems whose buffer was closed between scan and delivery.
    ///
    /// An anchor into a closed buffer must never be dereferenced; minor edits
    /// that keep the offset in range are fine.
    fn deliver(
        &self,
        results: HashMap<BufferId, Vec<Problem>>,
    ) -> HashMap<BufferId, Vec<Problem>> {
        results
            .into_iter()
            .filter_map(|(buffer, problems)| match self.ctx.store.content_len(buffer) {
                Some(length) => {
                    let live: Vec<Problem> = problems
                        .into_iter()
                        .filter(|problem| problem.anchor().offset <= length)
                        .collect();
                    Some((buffer, live))
                }
                None => {
                    log::debug!(
                        "discarding {} problem(s) for closed {}",
                        problems.len(),
                        buffer
                    );
                    None
                }
            })
            .collect()
    }

    /// Convert an escaped failure into its mandated side effect.
    async fn classify_failure(&self, error: ScanError) {
        match &error {
            ScanError::Cancelled => {
                log::debug!("scan cancelled");
            }
            ScanError::Parse { message } => {
                // Usually a transient edit state; never worth a user warning
                log::debug!("parse failure while preparing scan: {}", message);
            }
            ScanError::Io { message } => {
                log::debug!("I/O failure during scan: {}", message);
                self.ctx
                    .notifier
                    .warn(&format!("mypy could not read or write a scan file: {}", message))
                    .await;
            }
            ScanError::Checker { message } => {
                log::warn!("mypy threw an exception while scanning: {}", message);
                self.ctx.notifier.report_exception(&error).await;
            }
        }
    }
}

/// The blocking pipeline: prepare, invoke once, parse, filter.
///
/// Runs on a worker thread and owns the scratch cleanup, which executes on
/// every exit path — including when the façade already gave up waiting.
fn scan_blocking(
    ctx: &CheckerContext,
    snapshots: Vec<BufferSnapshot>,
    cancel: &CancellationToken,
) -> ScanResult<HashMap<BufferId, Vec<Problem>>> {
    let request = request_id(snapshots.iter().map(|snapshot| snapshot.path.as_path()));
    log::debug!("{}: scanning {} buffer(s)", request, snapshots.len());

    let mut files = prepare(&request, &snapshots, &ctx.config.scratch_root())?;
    if files.is_empty() {
        log::debug!("{}: no eligible buffers", request);
        return Ok(HashMap::new());
    }

    let snapshot_map: HashMap<BufferId, BufferSnapshot> = snapshots
        .into_iter()
        .map(|snapshot| (snapshot.id, snapshot))
        .collect();

    let outcome = ScanJob::new(ctx.runner.as_ref(), &files, &snapshot_map, cancel).run();

    for file in &mut files {
        file.dispose();
    }

    outcome
}

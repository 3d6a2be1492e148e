//! Scan coordinator
//!
//! `ScanJob` is the single-use unit of work behind one inspection request:
//! one batched checker invocation over the prepared file set, output parsing,
//! and the fixed post-filter. Consuming `self` in `run` makes reuse for a
//! second file set impossible by construction.

use crate::buffer::{BufferId, BufferSnapshot};
use crate::checker::parser;
use crate::checker::problem::Problem;
use crate::checker::runner::ProcessRunner;
use crate::core::cancel::CancellationToken;
use crate::scan::error::{ScanError, ScanResult};
use crate::scan::scannable::ScannableFile;
use std::collections::HashMap;
use std::path::PathBuf;

/// Bare-syntax noise the checker emits transiently while a file is mid-edit;
/// non-actionable, always filtered.
const ERROR_MESSAGE_INVALID_SYNTAX: &str = "invalid syntax";

/// Single-use scan unit for one batch of prepared files
pub struct ScanJob<'a> {
    runner: &'a dyn ProcessRunner,
    files: &'a [ScannableFile],
    snapshots: &'a HashMap<BufferId, BufferSnapshot>,
    cancel: &'a CancellationToken,
}

impl<'a> ScanJob<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        files: &'a [ScannableFile],
        snapshots: &'a HashMap<BufferId, BufferSnapshot>,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            runner,
            files,
            snapshots,
            cancel,
        }
    }

    /// Run the pipeline: one invocation for the whole batch, never per-file.
    ///
    /// Cancellation is checked cooperatively before the invocation and again
    /// before parsing, so an unwound request skips the rest of the pipeline.
    pub fn run(self) -> ScanResult<HashMap<BufferId, Vec<Problem>>> {
        if self.files.is_empty() {
            return Ok(HashMap::new());
        }
        if self.cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let paths: Vec<PathBuf> = self
            .files
            .iter()
            .map(|file| file.scan_path().to_path_buf())
            .collect();
        let raw = self.runner.invoke(&paths)?;

        if self.cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let scanned: Vec<(BufferId, PathBuf)> = self
            .files
            .iter()
            .map(|file| (file.buffer(), file.scan_path().to_path_buf()))
            .collect();
        let mut results = parser::parse(&raw, &scanned, self.snapshots);

        for problems in results.values_mut() {
            problems.retain(|problem| problem.message() != ERROR_MESSAGE_INVALID_SYNTAX);
        }

        Ok(results)
    }
}

//! ScannableFile preparer
//!
//! Pairs each eligible buffer with checker-consumable on-disk content.
//! Clean, saved buffers are scanned in place; modified-and-unsaved buffers
//! are materialized into per-request scratch directories. Every materialized
//! copy carries a disposal obligation that the owning scan request executes
//! exactly once, on every exit path.

use crate::buffer::{BufferId, BufferSnapshot, FileKind};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    #[error("content of {path} cannot be submitted to the checker: {reason}")]
    Unscannable { path: PathBuf, reason: String },

    #[error("scratch file error at {path}: {source}")]
    Scratch {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Ephemeral handle pairing a buffer with checker-readable content
#[derive(Debug)]
pub struct ScannableFile {
    buffer: BufferId,
    scan_path: PathBuf,
    scratch_dir: Option<PathBuf>,
    disposed: bool,
}

impl ScannableFile {
    pub fn buffer(&self) -> BufferId {
        self.buffer
    }

    /// Absolute path the checker should read.
    pub fn scan_path(&self) -> &Path {
        &self.scan_path
    }

    /// True when the content is a materialized scratch copy.
    pub fn is_temporary(&self) -> bool {
        self.scratch_dir.is_some()
    }

    /// Execute the disposal obligation. Idempotent; later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(dir) = &self.scratch_dir {
            if let Err(err) = std::fs::remove_dir_all(dir) {
                if dir.exists() {
                    log::warn!("failed to remove scratch dir {}: {}", dir.display(), err);
                }
            }
        }
    }
}

impl Drop for ScannableFile {
    fn drop(&mut self) {
        if !self.disposed {
            log::debug!(
                "scannable file for {} dropped without disposal, cleaning up",
                self.buffer
            );
            self.dispose();
        }
    }
}

/// Prepare a batch of snapshots for one scan request.
///
/// Ineligible buffers (wrong file kind, vanished on-disk content) are skipped
/// with a debug log; zero eligible buffers is a normal empty result. When
/// preparation fails partway through, everything created so far is disposed
/// before the error is returned.
pub fn prepare(
    request_id: &str,
    snapshots: &[BufferSnapshot],
    scratch_root: &Path,
) -> Result<Vec<ScannableFile>, PrepareError> {
    let mut files: Vec<ScannableFile> = Vec::new();

    for (index, snapshot) in snapshots.iter().enumerate() {
        if snapshot.kind != FileKind::Python {
            log::debug!(
                "{}: skipping {}: not a Python source",
                request_id,
                snapshot.path.display()
            );
            continue;
        }

        let prepared = if snapshot.dirty {
            materialize(request_id, index, snapshot, scratch_root).map(Some)
        } else {
            validate_on_disk(snapshot)
        };

        match prepared {
            Ok(Some(file)) => files.push(file),
            Ok(None) => {}
            Err(err) => {
                for file in &mut files {
                    file.dispose();
                }
                return Err(err);
            }
        }
    }

    Ok(files)
}

/// Write a dirty buffer's content into a fresh scratch directory.
///
/// The copy keeps the original file name so checker messages and module
/// resolution stay meaningful.
fn materialize(
    request_id: &str,
    index: usize,
    snapshot: &BufferSnapshot,
    scratch_root: &Path,
) -> Result<ScannableFile, PrepareError> {
    let dir = scratch_root.join(format!("{}-{}", request_id, index));
    std::fs::create_dir_all(&dir).map_err(|source| PrepareError::Scratch {
        path: dir.clone(),
        source,
    })?;

    let file_name = snapshot
        .path
        .file_name()
        .unwrap_or_else(|| OsStr::new("buffer.py"));
    let scan_path = dir.join(file_name);

    if let Err(source) = std::fs::write(&scan_path, &snapshot.content) {
        let _ = std::fs::remove_dir_all(&dir);
        return Err(PrepareError::Scratch {
            path: scan_path,
            source,
        });
    }

    log::debug!(
        "{}: materialized {} at {}",
        request_id,
        snapshot.path.display(),
        scan_path.display()
    );

    Ok(ScannableFile {
        buffer: snapshot.id,
        scan_path,
        scratch_dir: Some(dir),
        disposed: false,
    })
}

/// Check that a clean buffer's on-disk content is usable as-is.
///
/// A vanished file makes the buffer ineligible, not the batch failed;
/// undecodable content is an `Unscannable` error.
fn validate_on_disk(snapshot: &BufferSnapshot) -> Result<Option<ScannableFile>, PrepareError> {
    match std::fs::read_to_string(&snapshot.path) {
        Ok(_) => Ok(Some(ScannableFile {
            buffer: snapshot.id,
            scan_path: snapshot.path.clone(),
            scratch_dir: None,
            disposed: false,
        })),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::debug!(
                "skipping {}: no on-disk content to scan",
                snapshot.path.display()
            );
            Ok(None)
        }
        Err(err) if err.kind() == std::io::ErrorKind::InvalidData => {
            Err(PrepareError::Unscannable {
                path: snapshot.path.clone(),
                reason: "content is not valid UTF-8".to_string(),
            })
        }
        Err(source) => Err(PrepareError::Scratch {
            path: snapshot.path.clone(),
            source,
        }),
    }
}

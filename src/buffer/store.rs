//! Buffer store implementation
//!
//! Tracks open buffers, their dirty state, and hands out immutable snapshots
//! for scan requests. Concurrent inspection calls share one store behind an
//! `Arc`; all mutation goes through the store so the dirty flag stays
//! consistent with edits and saves.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Opaque identity of an open buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct BufferId(u64);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buffer-{}", self.0)
    }
}

/// File kind gate for scan eligibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum FileKind {
    Python,
    Other,
}

impl FileKind {
    /// Classify a path by extension; only Python sources are scannable.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("py") | Some("pyi") => FileKind::Python,
            _ => FileKind::Other,
        }
    }
}

/// One open editable buffer
#[derive(Debug, Clone)]
pub struct Buffer {
    id: BufferId,
    path: PathBuf,
    kind: FileKind,
    content: String,
    dirty: bool,
}

impl Buffer {
    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// True when the in-memory content has diverged from disk.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Immutable copy of a buffer taken at scan time
///
/// Snapshots travel into the blocking scan worker; the live buffer may be
/// edited or closed while the worker runs.
#[derive(Debug, Clone)]
pub struct BufferSnapshot {
    pub id: BufferId,
    pub path: PathBuf,
    pub kind: FileKind,
    pub content: String,
    pub dirty: bool,
}

impl BufferSnapshot {
    /// Byte range of a 1-based line, excluding the line terminator.
    ///
    /// Returns `None` when the line number lies past the end of the snapshot.
    pub fn line_span(&self, line: u32) -> Option<Range<usize>> {
        if line == 0 {
            return None;
        }
        let mut start = 0usize;
        let mut current = 1u32;
        for (index, byte) in self.content.bytes().enumerate() {
            if byte == b'\n' {
                if current == line {
                    let end = if index > start && self.content.as_bytes()[index - 1] == b'\r' {
                        index - 1
                    } else {
                        index
                    };
                    return Some(start..end);
                }
                start = index + 1;
                current += 1;
            }
        }
        if current == line && start <= self.content.len() {
            // Last line without a trailing newline; an empty final segment
            // still counts as a line when the content ends mid-file.
            if start == self.content.len() && self.content.ends_with('\n') {
                return None;
            }
            return Some(start..self.content.len());
        }
        None
    }
}

#[derive(Debug, Default)]
struct Inner {
    buffers: HashMap<BufferId, Buffer>,
    next_id: u64,
}

/// Store of open buffers shared across concurrent inspection calls
#[derive(Debug, Default)]
pub struct BufferStore {
    inner: RwLock<Inner>,
}

impl BufferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a buffer with the given in-memory content.
    ///
    /// The content is considered saved until the first `edit`.
    pub fn open(&self, path: impl Into<PathBuf>, content: impl Into<String>) -> BufferId {
        let path = path.into();
        let kind = FileKind::from_path(&path);
        let mut inner = self.write();
        inner.next_id += 1;
        let id = BufferId(inner.next_id);
        inner.buffers.insert(
            id,
            Buffer {
                id,
                path,
                kind,
                content: content.into(),
                dirty: false,
            },
        );
        id
    }

    /// Open a buffer by loading its content from disk.
    pub fn open_from_disk(&self, path: &Path) -> std::io::Result<BufferId> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.open(path, content))
    }

    /// Close a buffer; pending scan results for it are discarded at delivery.
    pub fn close(&self, id: BufferId) -> bool {
        self.write().buffers.remove(&id).is_some()
    }

    /// Replace a buffer's content, marking it modified and unsaved.
    pub fn edit(&self, id: BufferId, content: impl Into<String>) -> bool {
        let mut inner = self.write();
        match inner.buffers.get_mut(&id) {
            Some(buffer) => {
                buffer.content = content.into();
                buffer.dirty = true;
                true
            }
            None => false,
        }
    }

    /// Mark a buffer's content as flushed to disk.
    pub fn mark_saved(&self, id: BufferId) -> bool {
        let mut inner = self.write();
        match inner.buffers.get_mut(&id) {
            Some(buffer) => {
                buffer.dirty = false;
                true
            }
            None => false,
        }
    }

    pub fn is_open(&self, id: BufferId) -> bool {
        self.read().buffers.contains_key(&id)
    }

    pub fn is_modified_and_unsaved(&self, id: BufferId) -> bool {
        self.read()
            .buffers
            .get(&id)
            .map(Buffer::is_dirty)
            .unwrap_or(false)
    }

    pub fn path_of(&self, id: BufferId) -> Option<PathBuf> {
        self.read().buffers.get(&id).map(|b| b.path.clone())
    }

    /// Current content length in bytes, `None` once the buffer is closed.
    ///
    /// Used at delivery time to decide whether a scan-time anchor still
    /// resolves to a live position.
    pub fn content_len(&self, id: BufferId) -> Option<usize> {
        self.read().buffers.get(&id).map(|b| b.content.len())
    }

    /// Snapshot the requested buffers for one scan request.
    ///
    /// Buffers closed since the request was issued are silently skipped;
    /// an empty result is a normal outcome, not an error.
    pub fn snapshot(&self, ids: &[BufferId]) -> Vec<BufferSnapshot> {
        let inner = self.read();
        ids.iter()
            .filter_map(|id| inner.buffers.get(id))
            .map(|buffer| BufferSnapshot {
                id: buffer.id,
                path: buffer.path.clone(),
                kind: buffer.kind,
                content: buffer.content.clone(),
                dirty: buffer.dirty,
            })
            .collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().expect("buffer store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().expect("buffer store lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_kind_from_path() {
        assert_eq!(FileKind::from_path(Path::new("a/b/module.py")), FileKind::Python);
        assert_eq!(FileKind::from_path(Path::new("stubs.pyi")), FileKind::Python);
        assert_eq!(FileKind::from_path(Path::new("notes.txt")), FileKind::Other);
        assert_eq!(FileKind::from_path(Path::new("Makefile")), FileKind::Other);
    }

    #[test]
    fn test_open_edit_save_cycle() {
        let store = BufferStore::new();
        let id = store.open("/tmp/mod.py", "x = 1\n");

        assert!(store.is_open(id));
        assert!(!store.is_modified_and_unsaved(id));

        store.edit(id, "x = 2\n");
        assert!(store.is_modified_and_unsaved(id));

        store.mark_saved(id);
        assert!(!store.is_modified_and_unsaved(id));
    }

    #[test]
    fn test_close_invalidates_buffer() {
        let store = BufferStore::new();
        let id = store.open("/tmp/mod.py", "x = 1\n");

        assert!(store.close(id));
        assert!(!store.is_open(id));
        assert_eq!(store.content_len(id), None);
        assert!(!store.close(id));
    }

    #[test]
    fn test_snapshot_skips_closed_buffers() {
        let store = BufferStore::new();
        let a = store.open("/tmp/a.py", "a = 1\n");
        let b = store.open("/tmp/b.py", "b = 2\n");
        store.close(a);

        let snapshots = store.snapshot(&[a, b]);
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].id, b);
        assert_eq!(snapshots[0].content, "b = 2\n");
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_edits() {
        let store = BufferStore::new();
        let id = store.open("/tmp/a.py", "before\n");

        let snapshots = store.snapshot(&[id]);
        store.edit(id, "after\n");

        assert_eq!(snapshots[0].content, "before\n");
        assert!(store.is_modified_and_unsaved(id));
    }

    fn snapshot_of(content: &str) -> BufferSnapshot {
        BufferSnapshot {
            id: BufferId(1),
            path: PathBuf::from("/tmp/a.py"),
            kind: FileKind::Python,
            content: content.to_string(),
            dirty: false,
        }
    }

    #[test]
    fn test_line_span_basic() {
        let snapshot = snapshot_of("first\nsecond\nthird");

        assert_eq!(snapshot.line_span(1), Some(0..5));
        assert_eq!(snapshot.line_span(2), Some(6..12));
        assert_eq!(snapshot.line_span(3), Some(13..18));
        assert_eq!(snapshot.line_span(4), None);
        assert_eq!(snapshot.line_span(0), None);
    }

    #[test]
    fn test_line_span_crlf_and_trailing_newline() {
        let snapshot = snapshot_of("one\r\ntwo\n");

        assert_eq!(snapshot.line_span(1), Some(0..3));
        assert_eq!(snapshot.line_span(2), Some(5..8));
        // Content ends with a newline, so there is no third line.
        assert_eq!(snapshot.line_span(3), None);
    }
}

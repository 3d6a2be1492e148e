//! Buffer Model
//!
//! In-memory representation of the editable buffers the host editor exposes
//! to the scan pipeline. A buffer may have diverged from its on-disk content;
//! the pipeline only ever reads scan-time snapshots, never live buffers.

pub mod store;

pub use store::{Buffer, BufferId, BufferSnapshot, BufferStore, FileKind};

//! Scan coordinator unit tests

use crate::buffer::{BufferId, BufferSnapshot};
use crate::core::cancel::CancellationToken;
use crate::scan::coordinator::ScanJob;
use crate::scan::error::ScanError;
use crate::scan::scannable::{prepare, ScannableFile};
use crate::scan::tests::helpers::{ScanFixture, StubRunner};
use std::collections::HashMap;

fn prepared(
    fixture: &ScanFixture,
    buffers: &[BufferId],
) -> (Vec<ScannableFile>, HashMap<BufferId, BufferSnapshot>) {
    let snapshots = fixture.store.snapshot(buffers);
    let files = prepare("scan-test", &snapshots, fixture.scratch.path()).unwrap();
    let map = snapshots
        .into_iter()
        .map(|snapshot| (snapshot.id, snapshot))
        .collect();
    (files, map)
}

#[test]
fn test_empty_file_set_short_circuits() {
    let runner = StubRunner::clean();
    let cancel = CancellationToken::new();
    let snapshots = HashMap::new();

    let results = ScanJob::new(&runner, &[], &snapshots, &cancel).run().unwrap();

    assert!(results.is_empty());
    assert_eq!(runner.invocations(), 0);
}

#[test]
fn test_batch_is_invoked_exactly_once() {
    let fixture = ScanFixture::new();
    let a = fixture.saved_buffer("a.py", "x = 1\n");
    let b = fixture.saved_buffer("b.py", "y = 2\n");
    let (mut files, snapshots) = prepared(&fixture, &[a, b]);

    let runner = StubRunner::per_file("1:1: error: Something");
    let cancel = CancellationToken::new();

    let results = ScanJob::new(&runner, &files, &snapshots, &cancel)
        .run()
        .unwrap();

    assert_eq!(runner.invocations(), 1);
    assert_eq!(results.len(), 2);
    for file in &mut files {
        file.dispose();
    }
}

#[test]
fn test_invalid_syntax_sentinel_is_filtered() {
    let fixture = ScanFixture::new();
    let id = fixture.saved_buffer("a.py", "x = (\ny = 1\n");
    let (mut files, snapshots) = prepared(&fixture, &[id]);

    let path = files[0].scan_path().display().to_string();
    let raw = format!(
        "{path}:1:1: error: invalid syntax\n{path}:2:1: error: Real problem\n"
    );
    let runner = StubRunner::raw(&raw);
    let cancel = CancellationToken::new();

    let results = ScanJob::new(&runner, &files, &snapshots, &cancel)
        .run()
        .unwrap();

    let problems = &results[&id];
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].message(), "Real problem");
    for file in &mut files {
        file.dispose();
    }
}

#[test]
fn test_sentinel_must_match_exactly() {
    let fixture = ScanFixture::new();
    let id = fixture.saved_buffer("a.py", "x = (\n");
    let (mut files, snapshots) = prepared(&fixture, &[id]);

    // A message merely containing the sentinel text is a real diagnostic
    let runner = StubRunner::per_file("1:1: error: invalid syntax in annotation");
    let cancel = CancellationToken::new();

    let results = ScanJob::new(&runner, &files, &snapshots, &cancel)
        .run()
        .unwrap();

    assert_eq!(results[&id].len(), 1);
    for file in &mut files {
        file.dispose();
    }
}

#[test]
fn test_cancelled_before_invocation() {
    let fixture = ScanFixture::new();
    let id = fixture.saved_buffer("a.py", "x = 1\n");
    let (mut files, snapshots) = prepared(&fixture, &[id]);

    let runner = StubRunner::clean();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = ScanJob::new(&runner, &files, &snapshots, &cancel).run();

    assert!(matches!(result, Err(ScanError::Cancelled)));
    assert_eq!(runner.invocations(), 0);
    for file in &mut files {
        file.dispose();
    }
}

#[test]
fn test_process_failure_surfaces_classified() {
    use crate::checker::runner::ProcessFailure;

    let fixture = ScanFixture::new();
    let id = fixture.saved_buffer("a.py", "x = 1\n");
    let (mut files, snapshots) = prepared(&fixture, &[id]);

    let runner = StubRunner::failing(ProcessFailure::Crashed {
        status: "2".to_string(),
        stderr: "INTERNAL ERROR".to_string(),
    });
    let cancel = CancellationToken::new();

    let result = ScanJob::new(&runner, &files, &snapshots, &cancel).run();

    assert!(matches!(result, Err(ScanError::Checker { .. })));
    for file in &mut files {
        file.dispose();
    }
}

#[test]
fn test_runner_receives_materialized_paths() {
    let fixture = ScanFixture::new();
    let id = fixture.dirty_buffer("edited.py", "x: int = 'five'\n");
    let (mut files, snapshots) = prepared(&fixture, &[id]);
    assert!(files[0].is_temporary());

    let runner = StubRunner::per_file("1:10: error: Incompatible types");
    let cancel = CancellationToken::new();

    let results = ScanJob::new(&runner, &files, &snapshots, &cancel)
        .run()
        .unwrap();

    // The diagnostic against the scratch copy resolves back to the buffer
    assert_eq!(results[&id].len(), 1);
    assert_eq!(results[&id][0].message(), "Incompatible types");
    for file in &mut files {
        file.dispose();
    }
}

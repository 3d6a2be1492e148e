//! Checker output parser / problem builder
//!
//! Converts mypy's line-oriented diagnostic text into `Problem` entities
//! anchored back into the originating buffers. The grammar is owned by the
//! external tool, so the parser is defensive rather than grammar-complete:
//! malformed lines, unknown severity tokens, and paths that do not resolve to
//! a scanned buffer are dropped silently. Partial success is the default
//! posture — one bad line never fails the batch.

use crate::buffer::{BufferId, BufferSnapshot};
use crate::checker::problem::{Anchor, Problem, SeverityLevel};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// `path:line[:column]: severity: message` — the column is absent unless the
/// checker ran with `--show-column-numbers`.
static DIAGNOSTIC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<path>.+?):(?P<line>\d+):(?:(?P<column>\d+):)?\s*(?P<severity>[A-Za-z]+):\s?(?P<message>.*)$")
        .expect("diagnostic line pattern is valid")
});

/// Parse raw checker output into per-buffer problem lists.
///
/// `scanned` maps each path submitted to the checker back to its originating
/// buffer; `snapshots` provide the scan-time content used to compute anchors.
/// Insertion order within each buffer equals the checker's emission order.
pub fn parse(
    raw: &str,
    scanned: &[(BufferId, PathBuf)],
    snapshots: &HashMap<BufferId, BufferSnapshot>,
) -> HashMap<BufferId, Vec<Problem>> {
    let mut results: HashMap<BufferId, Vec<Problem>> = HashMap::new();

    for line in raw.lines() {
        let Some(captures) = DIAGNOSTIC_LINE.captures(line) else {
            log::trace!("skipping non-diagnostic output line: {line}");
            continue;
        };

        let severity = match SeverityLevel::from_str(&captures["severity"]) {
            Ok(severity) => severity,
            Err(_) => {
                log::debug!(
                    "dropping line with unknown severity token `{}`",
                    &captures["severity"]
                );
                continue;
            }
        };

        let Some(buffer) = resolve_buffer(&captures["path"], scanned) else {
            log::debug!(
                "dropping diagnostic for path outside this request: {}",
                &captures["path"]
            );
            continue;
        };

        // Guaranteed numeric by the pattern; reject absurd values instead of
        // panicking on overflow.
        let Ok(line_no) = captures["line"].parse::<u32>() else {
            continue;
        };
        let column = captures
            .name("column")
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(1);

        let Some(snapshot) = snapshots.get(&buffer) else {
            continue;
        };
        let Some((anchor, after_end_of_line)) = anchor_for(snapshot, line_no, column) else {
            log::debug!(
                "dropping diagnostic at {}:{}:{}: position not in snapshot",
                snapshot.path.display(),
                line_no,
                column
            );
            continue;
        };

        let message = captures["message"].to_string();
        let suppress_errors = severity == SeverityLevel::Note;
        results.entry(buffer).or_default().push(Problem::new(
            anchor,
            severity,
            line_no,
            column,
            message,
            after_end_of_line,
            suppress_errors,
        ));
    }

    results
}

/// Map a reported path back to the buffer whose content was submitted.
///
/// The checker echoes paths as given, but tolerate it reporting a relative
/// suffix of the submitted path.
fn resolve_buffer(reported: &str, scanned: &[(BufferId, PathBuf)]) -> Option<BufferId> {
    let reported = Path::new(reported);
    scanned
        .iter()
        .find(|(_, scan_path)| scan_path == &reported || scan_path.ends_with(reported))
        .map(|(buffer, _)| *buffer)
}

/// Compute the anchor for a 1-based line/column against the snapshot.
///
/// Columns past the end of the line clamp to line end and flag the problem as
/// trailing; lines past the end of the snapshot cannot be anchored at all.
fn anchor_for(snapshot: &BufferSnapshot, line: u32, column: u32) -> Option<(Anchor, bool)> {
    let span = snapshot.line_span(line)?;
    let line_text = &snapshot.content[span.clone()];
    let char_count = line_text.chars().count() as u32;
    let column0 = column.saturating_sub(1);

    let byte_in_line = line_text
        .char_indices()
        .nth(column0 as usize)
        .map(|(index, _)| index)
        .unwrap_or(line_text.len());

    let anchor = Anchor {
        buffer: snapshot.id,
        offset: span.start + byte_in_line,
    };
    Some((anchor, column0 >= char_count))
}

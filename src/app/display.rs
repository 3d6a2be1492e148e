//! Report rendering for the CLI

use crate::buffer::{BufferId, BufferStore};
use crate::checker::problem::{Problem, SeverityLevel};
use colored::Colorize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Buffers sorted by path for deterministic report order.
fn ordered_buffers(
    store: &BufferStore,
    results: &HashMap<BufferId, Vec<Problem>>,
) -> Vec<(PathBuf, BufferId)> {
    let mut buffers: Vec<(PathBuf, BufferId)> = results
        .keys()
        .filter_map(|id| store.path_of(*id).map(|path| (path, *id)))
        .collect();
    buffers.sort();
    buffers
}

fn severity_tag(severity: SeverityLevel, use_color: bool) -> String {
    let tag = severity.to_string();
    if !use_color {
        return tag;
    }
    match severity {
        SeverityLevel::Error => tag.red().bold().to_string(),
        SeverityLevel::Warning => tag.yellow().to_string(),
        SeverityLevel::Note => tag.cyan().to_string(),
    }
}

/// Render the scan result as human-readable text.
pub fn render_text(
    store: &BufferStore,
    results: &HashMap<BufferId, Vec<Problem>>,
    use_color: bool,
) -> String {
    let mut out = String::new();
    let mut total = 0usize;
    let mut file_count = 0usize;

    for (path, id) in ordered_buffers(store, results) {
        let problems = &results[&id];
        if problems.is_empty() {
            continue;
        }
        file_count += 1;
        for problem in problems {
            total += 1;
            out.push_str(&format!(
                "{}:{}:{}: {}: {}\n",
                path.display(),
                problem.line(),
                problem.column(),
                severity_tag(problem.severity(), use_color),
                problem.message()
            ));
        }
    }

    if total == 0 {
        out.push_str("no problems found\n");
    } else {
        out.push_str(&format!(
            "{} problem(s) in {} file(s)\n",
            total, file_count
        ));
    }
    out
}

/// Render the scan result as a JSON array of diagnostics.
pub fn render_json(
    store: &BufferStore,
    results: &HashMap<BufferId, Vec<Problem>>,
) -> serde_json::Value {
    let mut rows = Vec::new();
    for (path, id) in ordered_buffers(store, results) {
        for problem in &results[&id] {
            rows.push(serde_json::json!({
                "path": path.display().to_string(),
                "line": problem.line(),
                "column": problem.column(),
                "severity": problem.severity().to_string(),
                "message": problem.message(),
                "after_end_of_line": problem.is_after_end_of_line(),
                "suppress_errors": problem.suppresses_errors(),
            }));
        }
    }
    serde_json::Value::Array(rows)
}

/// True when the result should fail a CI-style run.
///
/// Soft diagnostics carrying `suppress_errors` never escalate.
pub fn has_hard_errors(results: &HashMap<BufferId, Vec<Problem>>) -> bool {
    results.values().flatten().any(|problem| {
        problem.severity() == SeverityLevel::Error && !problem.suppresses_errors()
    })
}

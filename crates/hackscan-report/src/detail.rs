//! Per-commit detail table: one row per commit, in traversal order.

use std::path::Path;

use hackscan_core::ScanError;
use hackscan_engine::ClassifiedCommit;

use crate::csv::{bit, line, minutes};

const HEADER: [&str; 15] = [
    "repo_id",
    "seq_index",
    "sha",
    "author_time_iso",
    "minutes_since_prev_commit",
    "minutes_since_t0",
    "insertions",
    "deletions",
    "files_changed",
    "is_merge",
    "is_before_t0",
    "is_during_event",
    "is_after_t1",
    "flag_bulk_commit",
    "subject",
];

/// Write the commit detail CSV for one repository.
///
/// The first row's `minutes_since_prev_commit` is empty (there is no
/// predecessor); booleans are encoded 0/1; the subject is carried verbatim
/// (CSV-quoted as needed).
///
/// # Errors
///
/// Returns [`ScanError::Io`] if the file cannot be written.
pub fn write_commit_detail(
    path: &Path,
    repo_id: &str,
    commits: &[ClassifiedCommit],
) -> Result<(), ScanError> {
    let mut out = String::new();
    out.push_str(&HEADER.join(","));
    out.push('\n');
    for (seq_index, commit) in commits.iter().enumerate() {
        let record = &commit.record;
        let fields = vec![
            repo_id.to_string(),
            seq_index.to_string(),
            record.id.clone(),
            record.authored_at.to_rfc3339(),
            minutes(commit.minutes_since_prev),
            format!("{:.2}", commit.minutes_since_t0),
            record.insertions.to_string(),
            record.deletions.to_string(),
            record.files_changed.to_string(),
            bit(record.is_merge()),
            bit(commit.is_before_t0),
            bit(commit.is_during),
            bit(commit.is_after_t1),
            bit(commit.flag_bulk_commit),
            record.subject.clone(),
        ];
        out.push_str(&line(&fields));
        out.push('\n');
    }
    std::fs::write(path, out)?;
    Ok(())
}

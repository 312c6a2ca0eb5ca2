//! Cross-repository comparison table.
//!
//! Rebuilt in full on every run from all materialized reports — never
//! merged incrementally. Row order follows the slice the caller passes
//! (roster order during a scan, sorted by repo id when rebuilding from the
//! store), which keeps re-runs byte-identical absent new data.

use std::path::Path;

use hackscan_core::ScanError;

use crate::artifact::MetricsReport;
use crate::csv::{bit, line, minutes};

const HEADER: [&str; 24] = [
    "repo_id",
    "repo",
    "default_branch",
    "t0",
    "t1",
    "total_commits",
    "total_commits_before_t0",
    "total_commits_during_event",
    "total_commits_after_t1",
    "total_loc_added",
    "total_loc_deleted",
    "max_loc_added_single_commit",
    "max_files_changed_single_commit",
    "median_minutes_between_commits",
    "median_minutes_between_commits_during_event",
    "commits_0_3h",
    "commits_3_6h",
    "commits_6_12h",
    "commits_12_24h",
    "commits_after_24h",
    "has_commits_before_t0",
    "has_bulk_commits",
    "has_large_initial_commit_after_t0",
    "has_merge_commits",
];

/// Write the comparison table: one row per report, flags as 0/1, absent
/// medians and `t1` as empty cells.
///
/// # Errors
///
/// Returns [`ScanError::Io`] if the file cannot be written.
pub fn write_comparison(path: &Path, reports: &[MetricsReport]) -> Result<(), ScanError> {
    let mut out = String::new();
    out.push_str(&HEADER.join(","));
    out.push('\n');
    for report in reports {
        out.push_str(&line(&row(report)));
        out.push('\n');
    }
    std::fs::write(path, out)?;
    Ok(())
}

fn row(report: &MetricsReport) -> Vec<String> {
    let summary = &report.summary;
    let dist = &report.time_distribution;
    let flags = &report.flags;
    vec![
        report.repo_id.clone(),
        report.repo.clone(),
        report.default_branch.clone(),
        report.t0.to_rfc3339(),
        report.t1.map(|t| t.to_rfc3339()).unwrap_or_default(),
        summary.total_commits.to_string(),
        summary.total_commits_before_t0.to_string(),
        summary.total_commits_during_event.to_string(),
        summary.total_commits_after_t1.to_string(),
        summary.total_loc_added.to_string(),
        summary.total_loc_deleted.to_string(),
        summary.max_loc_added_single_commit.to_string(),
        summary.max_files_changed_single_commit.to_string(),
        minutes(summary.median_minutes_between_commits),
        minutes(summary.median_minutes_between_commits_during_event),
        dist.commits_0_3h.to_string(),
        dist.commits_3_6h.to_string(),
        dist.commits_6_12h.to_string(),
        dist.commits_12_24h.to_string(),
        dist.commits_after_24h.to_string(),
        bit(flags.has_commits_before_t0),
        bit(flags.has_bulk_commits),
        bit(flags.has_large_initial_commit_after_t0),
        bit(flags.has_merge_commits),
    ]
}

//! Per-repository aggregation: counts, volume, medians, histogram.

use serde::{Deserialize, Serialize};

use crate::classify::ClassifiedCommit;

/// Aggregate statistics over one repository's classified commits.
///
/// Medians are `None` (serialized as explicit null) when their input set is
/// empty — they are never coerced to 0. Computed once per run; persisting
/// the surrounding report is what marks a repository as processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    /// Commits in the full history.
    pub total_commits: u64,
    /// Commits authored strictly before `t0`.
    pub total_commits_before_t0: u64,
    /// Commits inside the event window.
    pub total_commits_during_event: u64,
    /// Commits authored strictly after `t1`.
    pub total_commits_after_t1: u64,
    /// Insertions summed over all commits.
    pub total_loc_added: u64,
    /// Deletions summed over all commits.
    pub total_loc_deleted: u64,
    /// Largest single-commit insertion count.
    pub max_loc_added_single_commit: u64,
    /// Largest single-commit changed-file count.
    pub max_files_changed_single_commit: u64,
    /// Median of all inter-commit deltas; `None` with fewer than 2 commits.
    pub median_minutes_between_commits: Option<f64>,
    /// Median over adjacent pairs where both members are during-event;
    /// `None` when no such pair exists.
    pub median_minutes_between_commits_during_event: Option<f64>,
}

/// Histogram of during-event commits by hours elapsed since `t0`.
///
/// Buckets are half-open `[low, high)`; the last bucket is unbounded above.
///
/// # Examples
///
/// ```
/// use hackscan_engine::TimeDistribution;
///
/// let dist = TimeDistribution::default();
/// assert_eq!(dist.commits_0_3h, 0);
/// assert_eq!(dist.commits_after_24h, 0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeDistribution {
    /// Commits in `[0h, 3h)` after t0.
    pub commits_0_3h: u64,
    /// Commits in `[3h, 6h)` after t0.
    pub commits_3_6h: u64,
    /// Commits in `[6h, 12h)` after t0.
    pub commits_6_12h: u64,
    /// Commits in `[12h, 24h)` after t0.
    pub commits_12_24h: u64,
    /// Commits at or beyond 24h after t0.
    pub commits_after_24h: u64,
}

/// Compute summary statistics and the time-distribution histogram.
///
/// Pure over the classified sequence; an empty history yields all-zero
/// counts, `None` medians, and an empty histogram — a valid summary, not an
/// error.
///
/// The during-event median uses only the already-materialized
/// `minutes_since_prev` of commits whose immediate chronological
/// predecessor is also during-event. A during-event commit following a
/// pre-window commit still counts toward `total_commits_during_event`, but
/// its delta is excluded from this median.
pub fn summarize(commits: &[ClassifiedCommit]) -> (RepoSummary, TimeDistribution) {
    let mut all_deltas = Vec::new();
    let mut during_pair_deltas = Vec::new();
    let mut distribution = TimeDistribution::default();

    let mut prev_during = false;
    for commit in commits {
        if let Some(delta) = commit.minutes_since_prev {
            all_deltas.push(delta);
            if commit.is_during && prev_during {
                during_pair_deltas.push(delta);
            }
        }
        prev_during = commit.is_during;

        if commit.is_during {
            bucket_hours(&mut distribution, commit.minutes_since_t0 / 60.0);
        }
    }

    let summary = RepoSummary {
        total_commits: commits.len() as u64,
        total_commits_before_t0: commits.iter().filter(|c| c.is_before_t0).count() as u64,
        total_commits_during_event: commits.iter().filter(|c| c.is_during).count() as u64,
        total_commits_after_t1: commits.iter().filter(|c| c.is_after_t1).count() as u64,
        total_loc_added: commits.iter().map(|c| c.record.insertions).sum(),
        total_loc_deleted: commits.iter().map(|c| c.record.deletions).sum(),
        max_loc_added_single_commit: commits
            .iter()
            .map(|c| c.record.insertions)
            .max()
            .unwrap_or(0),
        max_files_changed_single_commit: commits
            .iter()
            .map(|c| c.record.files_changed)
            .max()
            .unwrap_or(0),
        median_minutes_between_commits: median(all_deltas),
        median_minutes_between_commits_during_event: median(during_pair_deltas),
    };
    (summary, distribution)
}

fn bucket_hours(distribution: &mut TimeDistribution, hours: f64) {
    // is_during implies hours >= 0 for in-order input.
    if hours < 3.0 {
        distribution.commits_0_3h += 1;
    } else if hours < 6.0 {
        distribution.commits_3_6h += 1;
    } else if hours < 12.0 {
        distribution.commits_6_12h += 1;
    } else if hours < 24.0 {
        distribution.commits_12_24h += 1;
    } else {
        distribution.commits_after_24h += 1;
    }
}

/// Standard statistical median: the middle value, or the average of the two
/// middle values for an even count. `None` for an empty input.
fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

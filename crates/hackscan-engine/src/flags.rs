//! Repository-level heuristic flags.
//!
//! Advisory signals for judges, never automatic decisions. Every flag is a
//! pure function of the classified commit sequence, so it can be recomputed
//! from persisted per-commit data and checked against the stored artifact.

use serde::{Deserialize, Serialize};

use crate::classify::ClassifiedCommit;

/// The four boolean flags derived from one repository's history.
///
/// # Examples
///
/// ```
/// use hackscan_engine::RepoFlags;
///
/// let flags = RepoFlags::default();
/// assert!(!flags.has_commits_before_t0);
/// assert!(!flags.has_merge_commits);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoFlags {
    /// Any commit authored strictly before the event start.
    pub has_commits_before_t0: bool,
    /// Any during-event commit exceeding the bulk thresholds.
    pub has_bulk_commits: bool,
    /// The chronologically first during-event commit is bulk.
    pub has_large_initial_commit_after_t0: bool,
    /// Any merge commit anywhere in history, regardless of classification.
    pub has_merge_commits: bool,
}

/// Evaluate the repository-level flags over a classified sequence.
///
/// `has_large_initial_commit_after_t0` looks at the first commit in
/// sequence order for which `is_during` holds; it is vacuously false when
/// no commit falls inside the window.
///
/// # Examples
///
/// ```
/// use hackscan_engine::{evaluate, RepoFlags};
///
/// assert_eq!(evaluate(&[]), RepoFlags::default());
/// ```
pub fn evaluate(commits: &[ClassifiedCommit]) -> RepoFlags {
    let first_during = commits.iter().find(|c| c.is_during);
    RepoFlags {
        has_commits_before_t0: commits.iter().any(|c| c.is_before_t0),
        has_bulk_commits: commits.iter().any(|c| c.is_during && c.flag_bulk_commit),
        has_large_initial_commit_after_t0: first_during.is_some_and(|c| c.flag_bulk_commit),
        has_merge_commits: commits.iter().any(|c| c.record.is_merge()),
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The normalized representation of one commit, ordered oldest to newest.
///
/// Produced by the history provider from a `git log --reverse --numstat`
/// traversal. Immutable once built; the engine never re-sorts — if the
/// traversal yields out-of-order timestamps, downstream deltas may be
/// negative and that is preserved as observable.
///
/// Line counts are summed across changed files; binary-file markers
/// contribute 0 lines but still count toward `files_changed`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use hackscan_core::CommitRecord;
///
/// let record = CommitRecord {
///     id: "a1b2c3".into(),
///     authored_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
///     author_name: "alice".into(),
///     author_email: "alice@example.com".into(),
///     parent_ids: vec!["deadbeef".into(), "cafebabe".into()],
///     insertions: 120,
///     deletions: 4,
///     files_changed: 3,
///     subject: "merge feature branch".into(),
/// };
/// assert!(record.is_merge());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Full commit hash.
    pub id: String,
    /// Author timestamp, normalized to UTC.
    pub authored_at: DateTime<Utc>,
    /// Author name, passed through unmodified.
    pub author_name: String,
    /// Author email, passed through unmodified.
    pub author_email: String,
    /// Parent commit hashes in order.
    pub parent_ids: Vec<String>,
    /// Lines added across all changed files.
    pub insertions: u64,
    /// Lines deleted across all changed files.
    pub deletions: u64,
    /// Number of changed paths.
    pub files_changed: u64,
    /// First line of the commit message, verbatim.
    pub subject: String,
}

impl CommitRecord {
    /// A commit with more than one parent is a merge.
    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }
}

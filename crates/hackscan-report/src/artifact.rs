use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hackscan_engine::{RepoFlags, RepoSummary, TimeDistribution};

/// The per-repository metrics artifact.
///
/// Everything a judge-facing consumer needs in one document: identity,
/// resolved window boundaries, scalar summary, histogram, and flags.
/// Numbers serialize as native numbers, timestamps as timezone-qualified
/// RFC-3339 strings, and absent statistics as explicit `null`.
///
/// The artifact's presence in the metrics directory marks its repository
/// as processed; see [`crate::MetricsStore`]. `generated_at` is the only
/// field that differs between identical re-runs.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use hackscan_engine::{RepoFlags, RepoSummary, TimeDistribution};
/// use hackscan_report::MetricsReport;
///
/// let report = MetricsReport {
///     repo_id: "team-a".into(),
///     repo: "octo/rocket".into(),
///     remote_url: "https://github.com/octo/rocket.git".into(),
///     default_branch: "main".into(),
///     t0: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
///     t1: None,
///     generated_at: Utc::now(),
///     summary: RepoSummary::default(),
///     time_distribution: TimeDistribution::default(),
///     flags: RepoFlags::default(),
/// };
/// let json = serde_json::to_value(&report).unwrap();
/// assert!(json["t1"].is_null());
/// assert!(json["summary"]["median_minutes_between_commits"].is_null());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Stable roster identifier.
    pub repo_id: String,
    /// Roster repo spec (`owner/name` or URL).
    pub repo: String,
    /// Resolved `origin` remote URL; empty when unknown.
    pub remote_url: String,
    /// Branch the traversal ran on.
    pub default_branch: String,
    /// Resolved event start for this repository.
    pub t0: DateTime<Utc>,
    /// Event end; `null` for an open-ended window.
    pub t1: Option<DateTime<Utc>>,
    /// When this artifact was computed.
    pub generated_at: DateTime<Utc>,
    /// Scalar aggregate statistics.
    pub summary: RepoSummary,
    /// Histogram of during-event commits by hours since `t0`.
    pub time_distribution: TimeDistribution,
    /// Repository-level heuristic flags.
    pub flags: RepoFlags,
}

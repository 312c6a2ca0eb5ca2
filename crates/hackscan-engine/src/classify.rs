//! Time classification: one forward pass over the commit sequence.
//!
//! Derived fields that need a chronological neighbor (inter-commit deltas,
//! the first-during-event scan) are materialized here once; downstream
//! consumers filter views over this sequence instead of recomputing
//! differences on filtered subsets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hackscan_core::time::minutes_between;
use hackscan_core::{CommitRecord, Thresholds};

/// The event window commits are classified against.
///
/// `t0` is required; `t1` is optional. Boundary semantics:
/// before is strict (`< t0`), during is inclusive on both ends
/// (`t0 <= t <= t1`, or `t >= t0` when `t1` is unset), after is strict
/// (`> t1`, never true without `t1`).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use hackscan_engine::EventWindow;
///
/// let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
/// let t1 = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();
/// let window = EventWindow { t0, t1: Some(t1) };
///
/// assert!(!window.is_before(t0));
/// assert!(window.is_during(t0));
/// assert!(window.is_during(t1));
/// assert!(!window.is_after(t1));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EventWindow {
    /// Event start, inclusive.
    pub t0: DateTime<Utc>,
    /// Event end, inclusive; open-ended when `None`.
    pub t1: Option<DateTime<Utc>>,
}

impl EventWindow {
    /// Strictly before the event start. A commit exactly at `t0` is not before.
    pub fn is_before(&self, at: DateTime<Utc>) -> bool {
        at < self.t0
    }

    /// Within the event window, inclusive on both ends.
    pub fn is_during(&self, at: DateTime<Utc>) -> bool {
        match self.t1 {
            Some(t1) => self.t0 <= at && at <= t1,
            None => at >= self.t0,
        }
    }

    /// Strictly after the event end. Always false when `t1` is unset.
    pub fn is_after(&self, at: DateTime<Utc>) -> bool {
        match self.t1 {
            Some(t1) => at > t1,
            None => false,
        }
    }
}

/// A commit plus every derived field, created once and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedCommit {
    /// The underlying commit record.
    #[serde(flatten)]
    pub record: CommitRecord,
    /// Minutes since the immediately preceding commit in traversal order.
    /// `None` for the first commit; negative when input is out of order.
    pub minutes_since_prev: Option<f64>,
    /// Minutes since `t0`; negative for pre-window commits.
    pub minutes_since_t0: f64,
    /// `authored_at < t0`, strict.
    pub is_before_t0: bool,
    /// Within `[t0, t1]` inclusive, or `>= t0` when `t1` is unset.
    pub is_during: bool,
    /// `authored_at > t1`, strict; always false without `t1`.
    pub is_after_t1: bool,
    /// Size heuristic: insertions or files changed at/above threshold.
    pub flag_bulk_commit: bool,
}

/// Classify an ordered commit sequence against an event window.
///
/// Pure, single pass, O(n). "Previous" always means the immediately
/// preceding record in traversal order, never a filtered subset. The bulk
/// flag is derived here too so that one pass materializes every per-commit
/// field together.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use hackscan_core::{CommitRecord, Thresholds};
/// use hackscan_engine::{classify, EventWindow};
///
/// let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
/// let record = CommitRecord {
///     id: "abc".into(),
///     authored_at: t0 + chrono::Duration::minutes(10),
///     author_name: "alice".into(),
///     author_email: "alice@example.com".into(),
///     parent_ids: vec![],
///     insertions: 12,
///     deletions: 1,
///     files_changed: 2,
///     subject: "init".into(),
/// };
/// let window = EventWindow { t0, t1: None };
/// let classified = classify(vec![record], &window, &Thresholds::default());
///
/// assert!(classified[0].is_during);
/// assert_eq!(classified[0].minutes_since_t0, 10.0);
/// assert!(classified[0].minutes_since_prev.is_none());
/// ```
pub fn classify(
    records: Vec<CommitRecord>,
    window: &EventWindow,
    thresholds: &Thresholds,
) -> Vec<ClassifiedCommit> {
    let mut classified = Vec::with_capacity(records.len());
    let mut prev_at: Option<DateTime<Utc>> = None;

    for record in records {
        let at = record.authored_at;
        let flag_bulk_commit = record.insertions >= thresholds.bulk_insertions
            || record.files_changed >= thresholds.bulk_files;
        classified.push(ClassifiedCommit {
            minutes_since_prev: prev_at.map(|prev| minutes_between(prev, at)),
            minutes_since_t0: minutes_between(window.t0, at),
            is_before_t0: window.is_before(at),
            is_during: window.is_during(at),
            is_after_t1: window.is_after(at),
            flag_bulk_commit,
            record,
        });
        prev_at = Some(at);
    }
    classified
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    fn record(at: DateTime<Utc>, insertions: u64, files: u64) -> CommitRecord {
        CommitRecord {
            id: format!("sha-{}", at.timestamp()),
            authored_at: at,
            author_name: "dev".into(),
            author_email: "dev@example.com".into(),
            parent_ids: vec!["parent".into()],
            insertions,
            deletions: 0,
            files_changed: files,
            subject: "work".into(),
        }
    }

    #[test]
    fn commit_exactly_at_t0_is_not_before() {
        let window = EventWindow { t0: t0(), t1: None };
        let out = classify(vec![record(t0(), 1, 1)], &window, &Thresholds::default());
        assert!(!out[0].is_before_t0);
        assert!(out[0].is_during);
        assert_eq!(out[0].minutes_since_t0, 0.0);
    }

    #[test]
    fn commit_exactly_at_t1_is_during_not_after() {
        let t1 = t0() + Duration::hours(24);
        let window = EventWindow { t0: t0(), t1: Some(t1) };
        let out = classify(vec![record(t1, 1, 1)], &window, &Thresholds::default());
        assert!(out[0].is_during);
        assert!(!out[0].is_after_t1);
    }

    #[test]
    fn after_t1_is_strict() {
        let t1 = t0() + Duration::hours(24);
        let window = EventWindow { t0: t0(), t1: Some(t1) };
        let late = record(t1 + Duration::seconds(1), 1, 1);
        let out = classify(vec![late], &window, &Thresholds::default());
        assert!(out[0].is_after_t1);
        assert!(!out[0].is_during);
    }

    #[test]
    fn without_t1_nothing_is_after() {
        let window = EventWindow { t0: t0(), t1: None };
        let far = record(t0() + Duration::days(365), 1, 1);
        let out = classify(vec![far], &window, &Thresholds::default());
        assert!(out[0].is_during);
        assert!(!out[0].is_after_t1);
    }

    #[test]
    fn minutes_since_prev_tracks_traversal_order() {
        let window = EventWindow { t0: t0(), t1: None };
        let records = vec![
            record(t0(), 1, 1),
            record(t0() + Duration::minutes(10), 1, 1),
            record(t0() + Duration::minutes(25), 1, 1),
        ];
        let out = classify(records, &window, &Thresholds::default());
        assert_eq!(out[0].minutes_since_prev, None);
        assert_eq!(out[1].minutes_since_prev, Some(10.0));
        assert_eq!(out[2].minutes_since_prev, Some(15.0));
    }

    #[test]
    fn out_of_order_input_yields_negative_delta_preserved() {
        let window = EventWindow { t0: t0(), t1: None };
        let records = vec![
            record(t0() + Duration::minutes(30), 1, 1),
            record(t0() + Duration::minutes(10), 1, 1),
        ];
        let out = classify(records, &window, &Thresholds::default());
        assert_eq!(out[1].minutes_since_prev, Some(-20.0));
    }

    #[test]
    fn minutes_since_t0_is_negative_before_window() {
        let window = EventWindow { t0: t0(), t1: None };
        let early = record(t0() - Duration::minutes(90), 1, 1);
        let out = classify(vec![early], &window, &Thresholds::default());
        assert_eq!(out[0].minutes_since_t0, -90.0);
        assert!(out[0].is_before_t0);
    }

    #[test]
    fn bulk_flag_uses_either_threshold() {
        let window = EventWindow { t0: t0(), t1: None };
        let thresholds = Thresholds::default();
        let out = classify(
            vec![
                record(t0(), 1000, 1),
                record(t0(), 999, 50),
                record(t0(), 999, 49),
            ],
            &window,
            &thresholds,
        );
        assert!(out[0].flag_bulk_commit);
        assert!(out[1].flag_bulk_commit);
        assert!(!out[2].flag_bulk_commit);
    }

    #[test]
    fn bulk_thresholds_are_configurable() {
        let window = EventWindow { t0: t0(), t1: None };
        let thresholds = Thresholds {
            bulk_insertions: 10,
            bulk_files: 3,
        };
        let out = classify(vec![record(t0(), 10, 1)], &window, &thresholds);
        assert!(out[0].flag_bulk_commit);
    }
}

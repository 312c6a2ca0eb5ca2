//! Persisted artifacts: the metrics report, its on-disk store, and the
//! judge-facing CSV outputs.
//!
//! Three artifacts per run, all consumed by external collaborators (the AI
//! summarizer and the results viewer):
//!
//! - `metrics/<repo_id>.json` — [`MetricsReport`], the unit of caching
//! - `metrics/<repo_id>_commits.csv` — per-commit detail rows
//! - `summary/metrics_summary.csv` — the cross-repository comparison table

mod artifact;
mod compare;
mod csv;
mod detail;
mod store;

pub use artifact::MetricsReport;
pub use compare::write_comparison;
pub use detail::write_commit_detail;
pub use store::MetricsStore;

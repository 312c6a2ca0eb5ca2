//! The commit metrics engine — deterministic, pure, reproducible.
//!
//! Turns an ordered commit sequence into time-classified, flagged, and
//! aggregated statistics relative to an event window `[t0, t1]`:
//!
//! - [`classify::classify`] — one forward pass deriving every per-commit
//!   field (window classification, inter-commit deltas, bulk flag)
//! - [`flags::evaluate`] — repository-level heuristic flags, recomputable
//!   from the classified sequence alone
//! - [`aggregate::summarize`] — counts, volume, medians, and the
//!   time-distribution histogram
//!
//! Every stage is a pure function of its input; running the engine twice on
//! the same sequence and boundaries yields identical output.

pub mod aggregate;
pub mod classify;
pub mod flags;

pub use aggregate::{summarize, RepoSummary, TimeDistribution};
pub use classify::{classify, ClassifiedCommit, EventWindow};
pub use flags::{evaluate, RepoFlags};

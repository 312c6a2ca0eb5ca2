//! Core types, configuration, and error handling for hackscan.
//!
//! This crate provides the shared foundation used by all other hackscan crates:
//! - [`ScanError`] — unified error type using `thiserror`
//! - [`ScanConfig`] — configuration loaded from `.hackscan.toml`
//! - [`CommitRecord`] — the normalized representation of one commit
//! - [`Roster`] — the repository roster consumed by a run
//! - Timestamp parsing helpers in [`time`]

mod config;
mod error;
mod record;
mod roster;
pub mod time;

pub use config::{ScanConfig, Thresholds, WorkDirs};
pub use error::ScanError;
pub use record::CommitRecord;
pub use roster::{Roster, RosterEntry};

/// A convenience `Result` type for hackscan operations.
pub type Result<T> = std::result::Result<T, ScanError>;

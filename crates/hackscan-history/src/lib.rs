//! History provider: working-copy management and commit extraction.
//!
//! The provider side of the pipeline — everything that touches a real git
//! repository. [`provider`] manages clones and runs the history traversal;
//! [`parse`] turns the traversal's raw numstat output into
//! [`hackscan_core::CommitRecord`] values, oldest first.
//!
//! The metrics engine never sees git; it consumes the records produced here.

pub mod parse;
pub mod provider;

pub use parse::{parse_log, ParsedLog};
pub use provider::{collect_history, default_branch, ensure_cloned, remote_url};

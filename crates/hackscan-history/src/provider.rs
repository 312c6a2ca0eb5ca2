//! Working-copy management and the history traversal itself.
//!
//! Clone, fetch, checkout, and the `git log` traversal shell out to the git
//! binary: the traversal contract is defined over its raw numstat output,
//! and the transports cover every URL scheme a roster can name. Local
//! introspection (default branch, remote URL) goes through libgit2.

use std::path::{Path, PathBuf};
use std::process::Command;

use git2::Repository;
use tracing::{debug, info};

use hackscan_core::{CommitRecord, ScanError};

use crate::parse::{parse_log, LOG_FORMAT};

/// Run a git subcommand against `repo_dir`, capturing stdout.
///
/// # Errors
///
/// Returns [`ScanError::Git`] when git cannot be spawned or exits non-zero;
/// the message carries trimmed stderr.
fn run_git(repo_dir: &Path, args: &[&str]) -> Result<String, ScanError> {
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_dir)
        .args(args)
        .output()
        .map_err(|e| ScanError::Git(format!("failed to run git: {e}")))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScanError::Git(format!(
            "git {} failed: {}",
            args.first().copied().unwrap_or(""),
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn clone_url(spec: &str) -> String {
    if spec.contains("://") {
        spec.to_string()
    } else {
        format!("https://github.com/{spec}.git")
    }
}

/// Clone `spec` into `repos_root/<repo_id>`, or bring an existing clone up
/// to date.
///
/// With `update`, an existing clone is fetched, checked out on the default
/// branch, and hard-reset to its remote tip so reruns see the current
/// history. Without it the clone is used as-is.
///
/// # Errors
///
/// Returns [`ScanError::Git`] on any failing git operation. The caller
/// treats this as a per-repository failure and moves on.
pub fn ensure_cloned(
    repo_id: &str,
    spec: &str,
    repos_root: &Path,
    update: bool,
) -> Result<PathBuf, ScanError> {
    let repo_dir = repos_root.join(repo_id);
    if !repo_dir.exists() {
        let url = clone_url(spec);
        info!(repo_id, %url, "cloning");
        let output = Command::new("git")
            .arg("clone")
            .arg(&url)
            .arg(&repo_dir)
            .output()
            .map_err(|e| ScanError::Git(format!("failed to run git: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::Git(format!(
                "clone of {url} failed: {}",
                stderr.trim()
            )));
        }
    } else if update {
        debug!(repo_id, "updating existing clone");
        run_git(&repo_dir, &["fetch", "--all", "--prune"])?;
        let branch = default_branch(&repo_dir)?;
        run_git(&repo_dir, &["checkout", &branch])?;
        run_git(&repo_dir, &["reset", "--hard", &format!("origin/{branch}")])?;
    }
    Ok(repo_dir)
}

/// Resolve the default branch name of a local clone.
///
/// Prefers `origin/HEAD`; falls back to the currently checked-out branch
/// for clones without a remote HEAD reference.
///
/// # Errors
///
/// Returns [`ScanError::Git`] if the repository cannot be opened or no
/// branch can be resolved.
pub fn default_branch(repo_dir: &Path) -> Result<String, ScanError> {
    let repo = Repository::open(repo_dir)
        .map_err(|e| ScanError::Git(format!("failed to open repository: {e}")))?;

    if let Ok(reference) = repo.resolve_reference_from_short_name("origin/HEAD") {
        if let Some(name) = reference.shorthand() {
            return Ok(name.strip_prefix("origin/").unwrap_or(name).to_string());
        }
    }

    let head = repo
        .head()
        .map_err(|e| ScanError::Git(format!("failed to resolve HEAD: {e}")))?;
    head.shorthand()
        .map(String::from)
        .ok_or_else(|| ScanError::Git("HEAD is not a named branch".into()))
}

/// The `origin` remote URL, or an empty string when there is none.
///
/// Recorded in the metrics artifact for traceability only, so absence is
/// not an error.
pub fn remote_url(repo_dir: &Path) -> String {
    let Ok(repo) = Repository::open(repo_dir) else {
        return String::new();
    };
    repo.find_remote("origin")
        .ok()
        .and_then(|remote| remote.url().map(String::from))
        .unwrap_or_default()
}

/// Check out `branch` and traverse its full history, oldest first.
///
/// Runs `git log --reverse --numstat` with the header format in
/// [`LOG_FORMAT`] and parses the output into records. Malformed blocks are
/// skipped with a warning by the parser.
///
/// # Errors
///
/// Returns [`ScanError::Git`] on a failing git invocation, or
/// [`ScanError::Parse`] when a non-empty log yields no usable records.
pub fn collect_history(repo_dir: &Path, branch: &str) -> Result<Vec<CommitRecord>, ScanError> {
    run_git(repo_dir, &["checkout", branch])?;
    let format_arg = format!("--pretty=format:{LOG_FORMAT}");
    let output = run_git(repo_dir, &["log", "--reverse", &format_arg, "--numstat"])?;
    let parsed = parse_log(&output)?;
    if parsed.skipped > 0 {
        info!(
            skipped = parsed.skipped,
            kept = parsed.records.len(),
            "history contained malformed commit blocks"
        );
    }
    Ok(parsed.records)
}

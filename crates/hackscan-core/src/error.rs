use std::path::PathBuf;

/// Errors that can occur across the hackscan pipeline.
///
/// Each variant wraps a specific failure domain. Library crates use this type
/// directly; the binary crate converts to `miette` diagnostics at the boundary.
/// Per-repository failures are reported and skipped by the caller — only a
/// systemic failure (e.g. the work directory cannot be created) aborts a run.
///
/// # Examples
///
/// ```
/// use hackscan_core::ScanError;
///
/// let err = ScanError::Time("not an ISO-8601 timestamp: 'yesterday'".into());
/// assert!(err.to_string().contains("yesterday"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Git operation failure (clone, fetch, checkout, log).
    #[error("git error: {0}")]
    Git(String),

    /// Commit history output that cannot be parsed.
    #[error("history parse error: {0}")]
    Parse(String),

    /// Invalid event boundary or commit timestamp.
    #[error("timestamp error: {0}")]
    Time(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ScanError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn git_error_displays_message() {
        let err = ScanError::Git("clone failed: exit status 128".into());
        assert_eq!(err.to_string(), "git error: clone failed: exit status 128");
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = ScanError::FileNotFound(PathBuf::from("/tmp/repos.csv"));
        assert!(err.to_string().contains("/tmp/repos.csv"));
    }
}

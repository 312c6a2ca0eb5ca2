use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Top-level configuration loaded from `.hackscan.toml`.
///
/// Resolution order: CLI flags > local config file > built-in defaults.
/// The config carries only tunables; event boundaries (`t0`/`t1`) and the
/// roster are run inputs, not configuration.
///
/// # Examples
///
/// ```
/// use hackscan_core::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert_eq!(config.thresholds.bulk_insertions, 1000);
/// assert_eq!(config.thresholds.bulk_files, 50);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Bulk-commit heuristic thresholds.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Work directory base path (default: `work`).
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from("work")
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            work_dir: default_work_dir(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Io`] if the file cannot be read, or
    /// [`ScanError::Toml`] if the content is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self, ScanError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Toml`] if parsing fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use hackscan_core::ScanConfig;
    ///
    /// let toml = r#"
    /// [thresholds]
    /// bulk_insertions = 500
    /// "#;
    /// let config = ScanConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.thresholds.bulk_insertions, 500);
    /// assert_eq!(config.thresholds.bulk_files, 50);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, ScanError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }
}

/// Thresholds for the bulk-commit heuristic.
///
/// A commit is flagged as bulk when it adds at least `bulk_insertions` lines
/// or touches at least `bulk_files` paths. These are advisory signals for
/// judges, never automatic decisions.
///
/// # Examples
///
/// ```
/// use hackscan_core::Thresholds;
///
/// let t = Thresholds::default();
/// assert_eq!(t.bulk_insertions, 1000);
/// assert_eq!(t.bulk_files, 50);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum insertions for a commit to count as bulk (default: 1000).
    #[serde(default = "default_bulk_insertions")]
    pub bulk_insertions: u64,
    /// Minimum changed files for a commit to count as bulk (default: 50).
    #[serde(default = "default_bulk_files")]
    pub bulk_files: u64,
}

fn default_bulk_insertions() -> u64 {
    1000
}

fn default_bulk_files() -> u64 {
    50
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            bulk_insertions: default_bulk_insertions(),
            bulk_files: default_bulk_files(),
        }
    }
}

/// Resolved work-directory layout for one run.
///
/// Clones live under `repos/`, per-repository artifacts under `metrics/`,
/// and the cross-repository comparison table under `summary/`.
#[derive(Debug, Clone)]
pub struct WorkDirs {
    /// Clone destination root.
    pub repos: PathBuf,
    /// Per-repository metrics JSON + commit detail CSV.
    pub metrics: PathBuf,
    /// Cross-repository comparison table.
    pub summary: PathBuf,
}

impl WorkDirs {
    /// Resolve the layout under `base` and create every directory.
    ///
    /// This is the one place the pipeline touches directory structure;
    /// failure here is run-fatal.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Io`] if a directory cannot be created.
    pub fn create(base: &Path) -> Result<Self, ScanError> {
        let dirs = Self {
            repos: base.join("repos"),
            metrics: base.join("metrics"),
            summary: base.join("summary"),
        };
        for dir in [&dirs.repos, &dirs.metrics, &dirs.summary] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(dirs)
    }
}

use std::path::PathBuf;

use tracing::{debug, info};

use hackscan_core::ScanError;

use crate::artifact::MetricsReport;

/// Explicit on-disk cache of metrics reports, keyed by repository id.
///
/// An existing artifact is authoritative: re-running the pipeline loads it
/// instead of recomputing, unless the caller forces a bypass. The
/// directory is passed in as configuration — the store never reads ambient
/// environment.
///
/// Writes go to a temporary sibling path and are renamed into place, so a
/// partially-written report is never observable as "processed".
#[derive(Debug, Clone)]
pub struct MetricsStore {
    metrics_dir: PathBuf,
}

impl MetricsStore {
    /// Create a store over `metrics_dir`. The directory must already exist
    /// (work-dir bootstrapping creates it).
    pub fn new(metrics_dir: impl Into<PathBuf>) -> Self {
        Self {
            metrics_dir: metrics_dir.into(),
        }
    }

    /// Path of the report artifact for `repo_id`.
    pub fn report_path(&self, repo_id: &str) -> PathBuf {
        self.metrics_dir.join(format!("{repo_id}.json"))
    }

    /// Path of the commit detail CSV for `repo_id`.
    pub fn detail_path(&self, repo_id: &str) -> PathBuf {
        self.metrics_dir.join(format!("{repo_id}_commits.csv"))
    }

    /// Load the report for `repo_id`, or `None` when not yet materialized.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Io`] on read failure or
    /// [`ScanError::Serialization`] for a corrupt artifact.
    pub fn load(&self, repo_id: &str) -> Result<Option<MetricsReport>, ScanError> {
        let path = self.report_path(repo_id);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let report: MetricsReport = serde_json::from_str(&content)?;
        Ok(Some(report))
    }

    /// Persist a fully-computed report for its repository.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Io`] or [`ScanError::Serialization`] on
    /// failure; on failure no artifact (old or new) is left half-written.
    pub fn save(&self, report: &MetricsReport) -> Result<(), ScanError> {
        let path = self.report_path(&report.repo_id);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(report)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &path)?;
        debug!(repo_id = %report.repo_id, path = %path.display(), "report persisted");
        Ok(())
    }

    /// Idempotent compute-or-load: return the cached report unless `force`
    /// is set, otherwise run `compute` and persist its result.
    ///
    /// The boolean in the result is `true` when the report came from cache.
    ///
    /// # Errors
    ///
    /// Propagates load/save errors and any error from `compute`. When
    /// `compute` fails nothing is written — the repository stays
    /// unprocessed rather than half-processed.
    pub fn load_or_compute<F>(
        &self,
        repo_id: &str,
        force: bool,
        compute: F,
    ) -> Result<(MetricsReport, bool), ScanError>
    where
        F: FnOnce() -> Result<MetricsReport, ScanError>,
    {
        if !force {
            if let Some(report) = self.load(repo_id)? {
                info!(repo_id, "using cached metrics");
                return Ok((report, true));
            }
        }
        let report = compute()?;
        self.save(&report)?;
        Ok((report, false))
    }

    /// All materialized reports, sorted by repository id.
    ///
    /// Used to rebuild the comparison table without rescanning; a stable
    /// order keeps the rebuilt table deterministic.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Io`] if the directory cannot be read, or a
    /// deserialization error for a corrupt artifact.
    pub fn load_all(&self) -> Result<Vec<MetricsReport>, ScanError> {
        let mut reports = Vec::new();
        for entry in std::fs::read_dir(&self.metrics_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = std::fs::read_to_string(&path)?;
            let report: MetricsReport = serde_json::from_str(&content)?;
            reports.push(report);
        }
        reports.sort_by(|a, b| a.repo_id.cmp(&b.repo_id));
        Ok(reports)
    }
}

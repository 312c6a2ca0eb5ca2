use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::ScanError;
use crate::time::parse_timestamp;

/// One repository to analyze, as listed in the roster CSV.
///
/// The roster is the run's input manifest: `id,repo[,t0]` with a header
/// row. `repo` is either an `owner/name` GitHub shorthand or a full clone
/// URL. A per-repository `t0` overrides the global event start.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    /// Stable identifier; also the artifact file stem and clone dir name.
    pub id: String,
    /// Repository spec: `owner/name` or a clone URL.
    pub repo: String,
    /// Optional per-repository event start override, kept raw until this
    /// entry is processed so one bad value fails one repository, not the
    /// roster.
    pub t0_override: Option<String>,
}

impl RosterEntry {
    /// Resolve this entry's event start: the per-row override when
    /// present, `global_t0` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Time`] for an unparsable override — silently
    /// falling back to the global boundary would misclassify every commit
    /// in this repository. The caller treats this as a per-repository
    /// failure and moves on.
    pub fn resolve_t0(&self, global_t0: DateTime<Utc>) -> Result<DateTime<Utc>, ScanError> {
        match self.t0_override.as_deref() {
            Some(raw) => parse_timestamp(raw),
            None => Ok(global_t0),
        }
    }
}

/// The full roster for one run.
///
/// # Examples
///
/// ```
/// use hackscan_core::Roster;
///
/// let csv = "id,repo,t0\n\
///            team-a,octo/rocket,\n\
///            team-b,octo/moon,2025-03-02T10:00:00Z\n";
/// let roster = Roster::from_csv(csv).unwrap();
/// assert_eq!(roster.entries.len(), 2);
/// assert!(roster.entries[1].t0_override.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Roster {
    /// Entries in file order. Comparison-table rows follow this order.
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    /// Load the roster from a CSV file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::FileNotFound`] if the file is missing,
    /// [`ScanError::Io`] on read failure, and the errors of
    /// [`Roster::from_csv`] otherwise.
    pub fn load(path: &Path) -> Result<Self, ScanError> {
        if !path.exists() {
            return Err(ScanError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_csv(&content)
    }

    /// Parse roster CSV content.
    ///
    /// The first row is a header naming at least `id` and `repo`; a `t0`
    /// column is optional. Rows missing an id or repo are skipped, matching
    /// the roster's role as a hand-maintained file. A per-row `t0` is kept
    /// verbatim; [`RosterEntry::resolve_t0`] validates it when the entry is
    /// processed, so one bad value never aborts the run.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Parse`] if the header is missing required
    /// columns.
    pub fn from_csv(content: &str) -> Result<Self, ScanError> {
        let mut lines = content.lines();
        let header = lines
            .next()
            .ok_or_else(|| ScanError::Parse("roster CSV is empty".into()))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();
        let id_col = column_index(&columns, "id")?;
        let repo_col = column_index(&columns, "repo")?;
        let t0_col = columns.iter().position(|c| *c == "t0");

        let mut entries = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            let id = fields.get(id_col).copied().unwrap_or("");
            let repo = fields.get(repo_col).copied().unwrap_or("");
            if id.is_empty() || repo.is_empty() {
                continue;
            }
            let t0_override = match t0_col.and_then(|i| fields.get(i)).copied() {
                Some(value) if !value.is_empty() => Some(value.to_string()),
                _ => None,
            };
            entries.push(RosterEntry {
                id: id.to_string(),
                repo: repo.to_string(),
                t0_override,
            });
        }
        Ok(Self { entries })
    }
}

fn column_index(columns: &[&str], name: &str) -> Result<usize, ScanError> {
    columns
        .iter()
        .position(|c| *c == name)
        .ok_or_else(|| ScanError::Parse(format!("roster CSV is missing a '{name}' column")))
}

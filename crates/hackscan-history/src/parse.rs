//! Parsing of `git log --reverse --pretty=... --numstat` output.
//!
//! The traversal emits commit blocks: a header line with unit-separator
//! (`0x1f`) delimited fields, followed by one numstat line per changed
//! file and usually a trailing blank line. Statless blocks (merges) run
//! directly into the next header, so the separator byte — which numstat
//! lines never contain — is what identifies a header. Binary files show
//! `-` instead of line counts; they contribute 0 lines but still count as
//! a changed file.
//!
//! Malformed blocks are skipped with a logged warning rather than aborting
//! the repository — one bad commit must not discard an otherwise usable
//! history. A non-empty log that yields zero usable records is an error.

use hackscan_core::time::parse_timestamp;
use hackscan_core::{CommitRecord, ScanError};
use tracing::warn;

/// Header field separator; `%x1f` in the log format.
const FIELD_SEP: char = '\u{1f}';

/// The pretty format the provider passes to `git log`.
///
/// Fields: full hash, author date (strict ISO-8601), author name, author
/// email, parent hashes, subject.
pub const LOG_FORMAT: &str = "%H%x1f%aI%x1f%an%x1f%ae%x1f%P%x1f%s";

/// Result of parsing one repository's history traversal.
#[derive(Debug, Clone)]
pub struct ParsedLog {
    /// Usable commit records, oldest first (traversal order).
    pub records: Vec<CommitRecord>,
    /// Count of malformed blocks that were skipped.
    pub skipped: usize,
}

/// Parse raw `git log` output into commit records.
///
/// # Errors
///
/// Returns [`ScanError::Parse`] only when the output contained commit
/// blocks but none of them were usable.
///
/// # Examples
///
/// ```
/// use hackscan_history::parse_log;
///
/// let sep = '\u{1f}';
/// let log = format!(
///     "abc123{sep}2025-03-01T09:10:00+00:00{sep}alice{sep}a@x.dev{sep}{sep}init\n\
///      10\t2\tsrc/main.rs\n\
///      -\t-\tlogo.png\n"
/// );
/// let parsed = parse_log(&log).unwrap();
/// assert_eq!(parsed.records.len(), 1);
/// assert_eq!(parsed.records[0].insertions, 10);
/// assert_eq!(parsed.records[0].files_changed, 2);
/// ```
pub fn parse_log(output: &str) -> Result<ParsedLog, ScanError> {
    let mut records: Vec<CommitRecord> = Vec::new();
    let mut skipped = 0usize;
    let mut current: Option<CommitRecord> = None;
    let mut in_bad_block = false;

    for line in output.lines() {
        if line.trim().is_empty() {
            // Block boundary.
            if let Some(record) = current.take() {
                records.push(record);
            }
            in_bad_block = false;
            continue;
        }

        if line.contains(FIELD_SEP) {
            // A header line. Merges emit no numstat lines and no trailing
            // blank, so the next header can follow a block directly.
            if let Some(record) = current.take() {
                records.push(record);
            }
            match parse_header(line) {
                Ok(record) => {
                    current = Some(record);
                    in_bad_block = false;
                }
                Err(err) => {
                    warn!(%err, "skipping malformed commit block");
                    skipped += 1;
                    in_bad_block = true;
                }
            }
            continue;
        }

        if in_bad_block {
            continue;
        }

        let Some(record) = current.as_mut() else {
            warn!(%line, "skipping malformed commit block");
            skipped += 1;
            in_bad_block = true;
            continue;
        };

        // Numstat line: "<insertions>\t<deletions>\t<path>".
        let mut fields = line.split('\t');
        if let (Some(ins_raw), Some(del_raw), Some(_path)) =
            (fields.next(), fields.next(), fields.next())
        {
            record.insertions += parse_count(ins_raw);
            record.deletions += parse_count(del_raw);
            record.files_changed += 1;
        }
    }
    if let Some(record) = current.take() {
        records.push(record);
    }

    if records.is_empty() && skipped > 0 {
        return Err(ScanError::Parse(format!(
            "no usable commits: all {skipped} block(s) were malformed"
        )));
    }
    Ok(ParsedLog { records, skipped })
}

fn parse_header(line: &str) -> Result<CommitRecord, ScanError> {
    let parts: Vec<&str> = line.splitn(6, FIELD_SEP).collect();
    let [sha, authored_raw, author_name, author_email, parents_raw, subject] = parts[..] else {
        return Err(ScanError::Parse(format!(
            "header has {} field(s), expected 6",
            parts.len()
        )));
    };
    if sha.is_empty() {
        return Err(ScanError::Parse("header has an empty commit hash".into()));
    }
    let authored_at = parse_timestamp(authored_raw)
        .map_err(|err| ScanError::Parse(format!("commit {sha}: {err}")))?;
    Ok(CommitRecord {
        id: sha.to_string(),
        authored_at,
        author_name: author_name.to_string(),
        author_email: author_email.to_string(),
        parent_ids: parents_raw.split_whitespace().map(String::from).collect(),
        insertions: 0,
        deletions: 0,
        files_changed: 0,
        subject: subject.to_string(),
    })
}

/// A numstat count: a number, or `-` for binary files (counts as 0 lines).
fn parse_count(raw: &str) -> u64 {
    raw.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const SEP: char = '\u{1f}';

    fn header(sha: &str, iso: &str, parents: &str, subject: &str) -> String {
        format!("{sha}{SEP}{iso}{SEP}dev{SEP}dev@example.com{SEP}{parents}{SEP}{subject}")
    }

    #[test]
    fn single_commit_with_numstat() {
        let log = format!(
            "{}\n5\t2\tsrc/lib.rs\n12\t0\tsrc/main.rs\n",
            header("abc", "2025-03-01T09:00:00+00:00", "", "init")
        );
        let parsed = parse_log(&log).unwrap();
        assert_eq!(parsed.skipped, 0);
        let record = &parsed.records[0];
        assert_eq!(record.id, "abc");
        assert_eq!(
            record.authored_at,
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
        );
        assert_eq!(record.insertions, 17);
        assert_eq!(record.deletions, 2);
        assert_eq!(record.files_changed, 2);
        assert!(record.parent_ids.is_empty());
    }

    #[test]
    fn blocks_are_blank_line_delimited() {
        let log = format!(
            "{}\n1\t0\ta.rs\n\n{}\n2\t1\tb.rs\n",
            header("c1", "2025-03-01T09:00:00Z", "", "first"),
            header("c2", "2025-03-01T10:00:00Z", "c1", "second"),
        );
        let parsed = parse_log(&log).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].id, "c1");
        assert_eq!(parsed.records[1].parent_ids, vec!["c1"]);
    }

    #[test]
    fn merge_commit_without_numstat_block() {
        // Merges traversed without -m emit a header and no stat lines.
        let log = format!(
            "{}\n\n{}\n3\t0\tx.rs\n",
            header("m1", "2025-03-01T12:00:00Z", "p1 p2", "merge branch"),
            header("c3", "2025-03-01T13:00:00Z", "m1", "after merge"),
        );
        let parsed = parse_log(&log).unwrap();
        assert_eq!(parsed.records.len(), 2);
        let merge = &parsed.records[0];
        assert!(merge.is_merge());
        assert_eq!(merge.files_changed, 0);
    }

    #[test]
    fn merge_header_directly_followed_by_next_header() {
        // git emits no blank line after a statless merge block; the next
        // header starts on the very next line. Its numstat must not be
        // attributed to the merge.
        let log = format!(
            "{}\n{}\n6\t1\ty.rs\n",
            header("m1", "2025-03-01T12:00:00Z", "p1 p2", "merge branch"),
            header("c3", "2025-03-01T13:00:00Z", "m1", "after merge"),
        );
        let parsed = parse_log(&log).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].insertions, 0);
        assert_eq!(parsed.records[0].files_changed, 0);
        assert_eq!(parsed.records[1].id, "c3");
        assert_eq!(parsed.records[1].insertions, 6);
    }

    #[test]
    fn binary_markers_count_files_but_no_lines() {
        let log = format!(
            "{}\n-\t-\tassets/logo.png\n4\t1\tsrc/ui.rs\n",
            header("bin", "2025-03-01T09:00:00Z", "p", "add logo")
        );
        let record = &parse_log(&log).unwrap().records[0];
        assert_eq!(record.insertions, 4);
        assert_eq!(record.deletions, 1);
        assert_eq!(record.files_changed, 2);
    }

    #[test]
    fn malformed_block_is_skipped_not_fatal() {
        let log = format!(
            "{}\n1\t0\ta.rs\n\nnot a header at all\n9\t9\tz.rs\n\n{}\n2\t0\tb.rs\n",
            header("good1", "2025-03-01T09:00:00Z", "", "ok"),
            header("good2", "2025-03-01T10:00:00Z", "good1", "also ok"),
        );
        let parsed = parse_log(&log).unwrap();
        assert_eq!(parsed.skipped, 1);
        let ids: Vec<&str> = parsed.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["good1", "good2"]);
    }

    #[test]
    fn bad_timestamp_skips_that_commit_only() {
        let log = format!(
            "{}\n5\t0\ta.rs\n\n{}\n7\t0\tb.rs\n",
            header("bad", "not-a-date", "", "broken"),
            header("good", "2025-03-01T10:00:00Z", "bad", "fine"),
        );
        let parsed = parse_log(&log).unwrap();
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].id, "good");
    }

    #[test]
    fn all_blocks_malformed_is_an_error() {
        let log = "garbage line\n\nmore garbage\n";
        assert!(parse_log(log).is_err());
    }

    #[test]
    fn empty_log_is_an_empty_history_not_an_error() {
        let parsed = parse_log("").unwrap();
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn subject_keeps_separator_bytes_verbatim() {
        // splitn(6) means a stray separator in the subject stays attached.
        let log = header("s1", "2025-03-01T09:00:00Z", "", &format!("a{SEP}b"));
        let parsed = parse_log(&log).unwrap();
        assert_eq!(parsed.records[0].subject, format!("a{SEP}b"));
    }

    #[test]
    fn timestamp_offset_is_normalized_to_utc() {
        let log = header("tz", "2025-03-01T11:00:00+02:00", "", "offset");
        let record = &parse_log(&log).unwrap().records[0];
        assert_eq!(
            record.authored_at,
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
        );
    }
}

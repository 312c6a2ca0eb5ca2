//! End-to-end scan over a local throwaway repository.

use std::path::Path;
use std::process::Command;

fn git(dir: &Path, date: &str, args: &[&str]) {
    let status = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .status()
        .expect("git should be runnable");
    assert!(status.success(), "git {args:?} failed");
}

/// Build an origin repo with one pre-window commit and one bulk commit
/// ten minutes into the window (t0 = 2025-03-01T09:00:00Z).
fn build_origin(dir: &Path) {
    git(dir, "2025-03-01T08:59:00+00:00", &["init", "-q", "-b", "main"]);
    git(dir, "2025-03-01T08:59:00+00:00", &["config", "user.email", "dev@example.com"]);
    git(dir, "2025-03-01T08:59:00+00:00", &["config", "user.name", "dev"]);

    std::fs::write(dir.join("notes.txt"), "setup\n").unwrap();
    git(dir, "2025-03-01T08:59:00+00:00", &["add", "."]);
    git(dir, "2025-03-01T08:59:00+00:00", &["commit", "-q", "-m", "head start"]);

    let big: String = (0..1200).map(|i| format!("line {i}\n")).collect();
    std::fs::write(dir.join("generated.txt"), big).unwrap();
    git(dir, "2025-03-01T09:10:00+00:00", &["add", "."]);
    git(dir, "2025-03-01T09:10:00+00:00", &["commit", "-q", "-m", "drop everything, demo time"]);
}

fn run_scan(cwd: &Path, roster: &Path, extra: &[&str]) {
    let output = Command::new(env!("CARGO_BIN_EXE_hackscan"))
        .arg("scan")
        .arg("--repos")
        .arg(roster)
        .args(["--t0", "2025-03-01T09:00:00Z"])
        .args(["--work-dir", "work"])
        .args(extra)
        .current_dir(cwd)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "hackscan scan failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn scan_writes_artifacts_and_caches() {
    let tmp = tempfile::tempdir().unwrap();
    let origin = tmp.path().join("origin");
    std::fs::create_dir(&origin).unwrap();
    build_origin(&origin);

    let roster = tmp.path().join("repos.csv");
    std::fs::write(
        &roster,
        format!("id,repo,t0\nteam-a,file://{},\n", origin.display()),
    )
    .unwrap();

    run_scan(tmp.path(), &roster, &[]);

    let metrics_path = tmp.path().join("work/metrics/team-a.json");
    let detail_path = tmp.path().join("work/metrics/team-a_commits.csv");
    let summary_path = tmp.path().join("work/summary/metrics_summary.csv");
    assert!(metrics_path.exists());
    assert!(detail_path.exists());
    assert!(summary_path.exists());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&metrics_path).unwrap()).unwrap();
    assert_eq!(report["repo_id"], "team-a");
    assert_eq!(report["default_branch"], "main");
    assert_eq!(report["summary"]["total_commits"], 2);
    assert_eq!(report["summary"]["total_commits_before_t0"], 1);
    assert_eq!(report["summary"]["total_commits_during_event"], 2 - 1);
    assert_eq!(report["flags"]["has_commits_before_t0"], true);
    assert_eq!(report["flags"]["has_bulk_commits"], true);
    assert_eq!(report["flags"]["has_large_initial_commit_after_t0"], true);
    assert_eq!(report["flags"]["has_merge_commits"], false);
    assert_eq!(report["time_distribution"]["commits_0_3h"], 1);
    assert!(report["t1"].is_null());

    let detail = std::fs::read_to_string(&detail_path).unwrap();
    assert_eq!(detail.lines().count(), 3);
    assert!(detail.contains("\"drop everything, demo time\""));

    let summary = std::fs::read_to_string(&summary_path).unwrap();
    assert_eq!(summary.lines().count(), 2);
    assert!(summary.lines().nth(1).unwrap().starts_with("team-a,"));
}

#[test]
fn rescan_is_cached_and_force_recomputes() {
    let tmp = tempfile::tempdir().unwrap();
    let origin = tmp.path().join("origin");
    std::fs::create_dir(&origin).unwrap();
    build_origin(&origin);

    let roster = tmp.path().join("repos.csv");
    std::fs::write(
        &roster,
        format!("id,repo\nteam-a,file://{}\n", origin.display()),
    )
    .unwrap();

    run_scan(tmp.path(), &roster, &[]);
    let metrics_path = tmp.path().join("work/metrics/team-a.json");
    let first = std::fs::read_to_string(&metrics_path).unwrap();

    // Without --force the cached artifact is authoritative: byte-identical.
    run_scan(tmp.path(), &roster, &[]);
    let second = std::fs::read_to_string(&metrics_path).unwrap();
    assert_eq!(first, second);

    // With --force the artifact is recomputed; everything but the
    // generation timestamp must be identical.
    run_scan(tmp.path(), &roster, &["--force"]);
    let third = std::fs::read_to_string(&metrics_path).unwrap();

    let mut a: serde_json::Value = serde_json::from_str(&first).unwrap();
    let mut b: serde_json::Value = serde_json::from_str(&third).unwrap();
    a["generated_at"] = serde_json::Value::Null;
    b["generated_at"] = serde_json::Value::Null;
    assert_eq!(a, b);
}

#[test]
fn failing_repositories_are_skipped_not_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let origin = tmp.path().join("origin");
    std::fs::create_dir(&origin).unwrap();
    build_origin(&origin);

    // Two broken rows (unreachable clone source, unparsable t0 override)
    // sandwich a healthy one.
    let roster = tmp.path().join("repos.csv");
    std::fs::write(
        &roster,
        format!(
            "id,repo,t0\n\
             ghost,file://{missing},\n\
             team-a,file://{origin},\n\
             badclock,file://{origin},yesterday-ish\n",
            missing = tmp.path().join("nope").display(),
            origin = origin.display(),
        ),
    )
    .unwrap();

    run_scan(tmp.path(), &roster, &[]);

    // The broken rows produced no artifacts; the good one still did.
    assert!(!tmp.path().join("work/metrics/ghost.json").exists());
    assert!(!tmp.path().join("work/metrics/badclock.json").exists());
    assert!(tmp.path().join("work/metrics/team-a.json").exists());

    let summary = std::fs::read_to_string(tmp.path().join("work/summary/metrics_summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 2);
    assert!(summary.lines().nth(1).unwrap().starts_with("team-a,"));
}

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use miette::{IntoDiagnostic, Result};
use rayon::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use hackscan_core::time::parse_timestamp;
use hackscan_core::{Roster, RosterEntry, ScanConfig, ScanError, Thresholds, WorkDirs};
use hackscan_engine::{classify, evaluate, summarize, EventWindow};
use hackscan_history::{collect_history, default_branch, ensure_cloned, remote_url};
use hackscan_report::{write_commit_detail, write_comparison, MetricsReport, MetricsStore};

#[derive(Parser)]
#[command(
    name = "hackscan",
    version,
    about = "Objective commit-timing metrics for hackathon judging",
    long_about = "Hackscan analyzes the commit history of hackathon submissions and produces\n\
                   objective, judge-readable metrics relative to the event window: when code\n\
                   was written, how much landed at once, and which heuristic flags apply.\n\n\
                   Flags are advisory signals, never disqualification decisions.\n\n\
                   Examples:\n  \
                     hackscan scan --repos repos.csv --t0 2025-03-01T09:00:00Z\n  \
                     hackscan scan --repos repos.csv --t0 ... --t1 ... --force\n  \
                     hackscan compare                Rebuild the comparison table from cache"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .hackscan.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze every repository in the roster and write metrics artifacts
    #[command(long_about = "Analyze every repository in the roster.\n\n\
        Clones or updates each working copy, traverses its full history, classifies\n\
        commits against the event window, and writes per-repository metrics JSON and\n\
        commit detail CSV plus the cross-repository comparison table.\n\n\
        Existing metrics artifacts are authoritative: already-processed repositories\n\
        are skipped unless --force is given. A failure in one repository is logged\n\
        and skipped; it never aborts the run.\n\n\
        Examples:\n  hackscan scan --repos repos.csv --t0 2025-03-01T09:00:00Z\n  \
        hackscan scan --repos repos.csv --t0 2025-03-01T09:00:00Z --t1 2025-03-02T09:00:00Z")]
    Scan {
        /// Roster CSV listing repositories (columns: id, repo, optional t0)
        #[arg(long)]
        repos: PathBuf,

        /// Global event start (ISO-8601, timezone-aware)
        #[arg(long)]
        t0: String,

        /// Event end (ISO-8601); window is open-ended when omitted
        #[arg(long)]
        t1: Option<String>,

        /// Work directory base path (overrides config; default: work)
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Recompute metrics even when a cached artifact exists
        #[arg(long)]
        force: bool,

        /// Do not fetch/reset existing clones before traversing
        #[arg(long)]
        no_update: bool,
    },
    /// Rebuild the comparison table from cached metrics only
    #[command(long_about = "Rebuild the cross-repository comparison table.\n\n\
        Reads every materialized metrics artifact under the work directory and\n\
        rewrites summary/metrics_summary.csv, sorted by repository id. No git\n\
        operations are performed.")]
    Compare {
        /// Work directory base path (overrides config; default: work)
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },
    /// Create a default .hackscan.toml configuration file
    #[command(long_about = "Create a default .hackscan.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .hackscan.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

const DEFAULT_CONFIG: &str = "\
# hackscan configuration
#
# Every value is optional; the defaults below are the built-in ones.

# Work directory for clones and artifacts.
# work_dir = \"work\"

[thresholds]
# A commit is flagged as bulk when either threshold is met.
# bulk_insertions = 1000
# bulk_files = 50
";

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!("hackscan v{version} — objective commit-timing metrics for hackathon judging\n");

    println!("Quick start:");
    println!("  hackscan init                                     Create a .hackscan.toml config");
    println!("  hackscan scan --repos repos.csv --t0 <ISO-8601>   Analyze every roster repository\n");

    println!("All commands:");
    println!("  scan      Clone, traverse, classify, and write metrics artifacts");
    println!("  compare   Rebuild the comparison table from cached metrics");
    println!("  init      Create default configuration\n");

    println!("Run 'hackscan <command> --help' for details.");
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => ScanConfig::from_file(path).into_diagnostic()?,
        None => {
            let default_path = Path::new(".hackscan.toml");
            if default_path.exists() {
                ScanConfig::from_file(default_path).into_diagnostic()?
            } else {
                ScanConfig::default()
            }
        }
    };

    match cli.command {
        None => {
            print_welcome();
        }
        Some(Command::Scan {
            repos,
            t0,
            t1,
            work_dir,
            force,
            no_update,
        }) => {
            let global_t0 = parse_timestamp(&t0).into_diagnostic()?;
            let global_t1 = t1
                .as_deref()
                .map(parse_timestamp)
                .transpose()
                .into_diagnostic()?;
            let base = work_dir.unwrap_or_else(|| config.work_dir.clone());
            run_scan(ScanOptions {
                repos,
                global_t0,
                global_t1,
                base,
                thresholds: config.thresholds,
                force,
                update: !no_update,
            })?;
        }
        Some(Command::Compare { work_dir }) => {
            let base = work_dir.unwrap_or_else(|| config.work_dir.clone());
            run_compare(&base)?;
        }
        Some(Command::Init) => {
            let path = Path::new(".hackscan.toml");
            if path.exists() {
                miette::bail!(".hackscan.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .hackscan.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "hackscan", &mut std::io::stdout());
        }
    }

    Ok(())
}

struct ScanOptions {
    repos: PathBuf,
    global_t0: DateTime<Utc>,
    global_t1: Option<DateTime<Utc>>,
    base: PathBuf,
    thresholds: Thresholds,
    force: bool,
    update: bool,
}

fn run_scan(options: ScanOptions) -> Result<()> {
    let roster = Roster::load(&options.repos).into_diagnostic()?;
    if roster.entries.is_empty() {
        warn!("roster contains no repositories");
        return Ok(());
    }

    let dirs = WorkDirs::create(&options.base).into_diagnostic()?;
    let store = MetricsStore::new(dirs.metrics.clone());

    let bar = ProgressBar::new(roster.entries.len() as u64);
    bar.set_style(ProgressStyle::default_bar());

    // Repositories are independent units of work: no shared mutable state,
    // distinct artifact paths, failures isolated per repository.
    let outcomes: Vec<std::result::Result<MetricsReport, ScanError>> = roster
        .entries
        .par_iter()
        .progress_with(bar)
        .map(|entry| scan_repository(entry, &options, &dirs, &store))
        .collect();

    let mut reports = Vec::new();
    let mut failed = 0usize;
    for (entry, outcome) in roster.entries.iter().zip(outcomes) {
        match outcome {
            Ok(report) => reports.push(report),
            Err(err) => {
                failed += 1;
                error!(repo_id = %entry.id, %err, "repository failed, skipping");
            }
        }
    }

    if reports.is_empty() {
        warn!("no summary rows generated");
    } else {
        let summary_path = dirs.summary.join("metrics_summary.csv");
        write_comparison(&summary_path, &reports).into_diagnostic()?;
        info!(path = %summary_path.display(), "wrote comparison table");
    }

    println!(
        "Processed {} repositories ({} failed).",
        reports.len(),
        failed
    );
    Ok(())
}

fn scan_repository(
    entry: &RosterEntry,
    options: &ScanOptions,
    dirs: &WorkDirs,
    store: &MetricsStore,
) -> std::result::Result<MetricsReport, ScanError> {
    // A bad per-row override fails this repository only; the rest of the
    // roster proceeds.
    let t0 = entry.resolve_t0(options.global_t0)?;
    let window = EventWindow {
        t0,
        t1: options.global_t1,
    };

    let (report, cached) = store.load_or_compute(&entry.id, options.force, || {
        let repo_dir = ensure_cloned(&entry.id, &entry.repo, &dirs.repos, options.update)?;
        let branch = default_branch(&repo_dir)?;
        let records = collect_history(&repo_dir, &branch)?;

        let commits = classify(records, &window, &options.thresholds);
        let flags = evaluate(&commits);
        let (summary, time_distribution) = summarize(&commits);

        // Detail CSV first: the JSON artifact is the "processed" marker and
        // must land last so its presence implies a complete set.
        write_commit_detail(&store.detail_path(&entry.id), &entry.id, &commits)?;

        Ok(MetricsReport {
            repo_id: entry.id.clone(),
            repo: entry.repo.clone(),
            remote_url: remote_url(&repo_dir),
            default_branch: branch,
            t0,
            t1: options.global_t1,
            generated_at: Utc::now(),
            summary,
            time_distribution,
            flags,
        })
    })?;

    if !cached {
        info!(
            repo_id = %entry.id,
            commits = report.summary.total_commits,
            "processed repository"
        );
    }
    Ok(report)
}

fn run_compare(base: &Path) -> Result<()> {
    let dirs = WorkDirs::create(base).into_diagnostic()?;
    let store = MetricsStore::new(dirs.metrics.clone());
    let reports = store.load_all().into_diagnostic()?;

    if reports.is_empty() {
        warn!("no metrics artifacts found; run 'hackscan scan' first");
        return Ok(());
    }

    let summary_path = dirs.summary.join("metrics_summary.csv");
    write_comparison(&summary_path, &reports).into_diagnostic()?;
    println!(
        "Wrote comparison table for {} repositories to {}",
        reports.len(),
        summary_path.display()
    );
    Ok(())
}

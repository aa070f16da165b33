//! CLI entry point for the manifest integrity verifier.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use harvester_core::verify::{EntryStatus, verify_manifest};
use tracing::{error, info, warn};

/// Verify a prior crawl's output against an MD5 manifest.
///
/// Every manifest entry is checked and reported; the process exits
/// non-zero if any entry fails or is missing, or if the manifest itself
/// cannot be found.
#[derive(Parser, Debug)]
#[command(name = "verify-manifest")]
#[command(author, version, about)]
struct Args {
    /// Manifest file of `"{md5-hex}  {relative-path}"` lines
    #[arg(default_value = "manifest.md5")]
    manifest: PathBuf,

    /// Root directory the manifest's relative paths resolve against
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Suppress per-entry PASS output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.quiet { "warn" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let report = match verify_manifest(&args.root, &args.manifest) {
        Ok(report) => report,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    for entry in &report.entries {
        match entry.status {
            EntryStatus::Pass => info!(path = %entry.path.display(), "PASS"),
            EntryStatus::Fail => warn!(path = %entry.path.display(), "FAIL"),
            EntryStatus::Missing => warn!(path = %entry.path.display(), "MISSING"),
        }
    }

    if report.all_passed() {
        info!(entries = report.entries.len(), "manifest verified");
        ExitCode::SUCCESS
    } else {
        error!(entries = report.entries.len(), "manifest verification failed");
        ExitCode::FAILURE
    }
}

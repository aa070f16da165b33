//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Crawl paginated document listings and download every discovered
/// document with structural validation.
#[derive(Parser, Debug)]
#[command(name = "harvester")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to a JSON config file overriding the built-in defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output root directory (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// First dataset id to crawl, inclusive (overrides config)
    #[arg(long)]
    pub first_dataset: Option<u32>,

    /// Last dataset id to crawl, exclusive (overrides config)
    #[arg(long)]
    pub last_dataset: Option<u32>,
}

//! CLI entry point for the harvester crawler.

use anyhow::Result;
use clap::Parser;
use harvester_core::browser::launch_browser;
use harvester_core::{
    CrawlConfig, DatasetCrawler, HttpClient, ValidatedDownloader, ValidationRules,
};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("Harvester starting");

    let mut config = match &args.config {
        Some(path) => CrawlConfig::from_file(path)?,
        None => CrawlConfig::default(),
    };
    if let Some(output) = args.output {
        config.output_root = output;
    }
    if let Some(first) = args.first_dataset {
        config.first_dataset = first;
    }
    if let Some(last) = args.last_dataset {
        config.last_dataset = last;
    }

    let client = HttpClient::from_config(&config)?;
    let rules = ValidationRules::from_config(&config);
    let downloader = ValidatedDownloader::new(client, config.output_root.clone(), rules);

    let browser = launch_browser(&config.user_agent).await?;
    let page = browser.new_page().await?;

    let crawler = DatasetCrawler::new(&page, &downloader, &config);
    let stats = crawler.run().await;

    browser.close().await;

    let download_stats = downloader.stats();
    info!(
        datasets = stats.datasets,
        pages = stats.pages_requested,
        saved = download_stats.saved(),
        already_present = download_stats.already_present(),
        skipped_invalid = download_stats.skipped_invalid(),
        failed = download_stats.failed(),
        "Crawl complete"
    );

    Ok(())
}

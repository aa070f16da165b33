//! Harvester Core Library
//!
//! This library crawls paginated document listings on a remote site,
//! clearing the interactive challenges the site interposes (bot check,
//! age gate), and downloads every discovered document exactly once with
//! structural validation. A separate verifier checks a prior run's
//! output against an MD5 manifest.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`browser`] - Headless-browser driver seam and chromium adapter
//! - [`config`] - Crawl configuration (URL template, ranges, thresholds)
//! - [`crawl`] - Pagination, challenge clearing, link extraction
//! - [`download`] - Validated HTTP download with at-most-once writes
//! - [`verify`] - Manifest-driven integrity verification

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod browser;
pub mod config;
pub mod crawl;
pub mod download;
pub mod verify;

// Re-export commonly used types
pub use browser::{BrowserCookie, BrowserError, BrowserPage};
pub use crawl::{ClearOutcome, CrawlStats, DatasetCrawler, DocumentSink, pagination_complete};
pub use config::CrawlConfig;
pub use download::{
    DownloadError, DownloadStats, FetchOutcome, HttpClient, ValidatedDownloader, ValidationRules,
};
pub use verify::{EntryStatus, VerifyError, VerifyReport, verify_manifest};

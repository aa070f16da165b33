//! Crawl configuration.
//!
//! Everything the crawl parameterizes over lives here: the listing URL
//! template, the dataset range, the document link pattern, output layout,
//! structural-validation thresholds, timeouts, and the fixed header triple
//! sent on every outbound request. All fields have production defaults and
//! can be overridden from a JSON file.

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Placeholder in the listing template replaced by the dataset id.
const DATASET_PLACEHOLDER: &str = "{dataset}";

/// Placeholder in the listing template replaced by the page index.
const PAGE_PLACEHOLDER: &str = "{page}";

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`CrawlConfig`].
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// Crawl configuration with production defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlConfig {
    /// Origin used to absolutize relative document hrefs.
    pub site_root: String,
    /// Listing page URL template with `{dataset}` and `{page}` placeholders.
    pub listing_template: String,
    /// First dataset id to crawl (inclusive).
    pub first_dataset: u32,
    /// Last dataset id to crawl (exclusive).
    pub last_dataset: u32,
    /// Substring a document href must contain (e.g. `.pdf`).
    pub file_pattern: String,
    /// Root directory for downloaded documents.
    pub output_root: PathBuf,
    /// Minimum byte length for a body to count as a real document.
    pub min_document_bytes: u64,
    /// Leading bytes identifying the expected document format.
    pub magic_prefix: Vec<u8>,
    /// Per-download timeout in seconds.
    pub download_timeout_secs: u64,
    /// User-Agent sent on every outbound request.
    pub user_agent: String,
    /// Accept header sent on every outbound request.
    pub accept: String,
    /// Referer header sent on every outbound request.
    pub referer: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            site_root: "https://www.justice.gov".to_string(),
            listing_template:
                "https://www.justice.gov/epstein/doj-disclosures/data-set-{dataset}-files?page={page}"
                    .to_string(),
            first_dataset: 0,
            last_dataset: 15,
            file_pattern: ".pdf".to_string(),
            output_root: PathBuf::from("downloads"),
            min_document_bytes: 1024,
            magic_prefix: b"%PDF-".to_vec(),
            download_timeout_secs: 60,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,\
                image/webp,*/*;q=0.8"
                .to_string(),
            referer: "https://www.google.com/".to_string(),
        }
    }
}

impl CrawlConfig {
    /// Loads configuration from a JSON file, with defaults for absent fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not a valid config document.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Renders the listing page URL for one `(dataset, page)` pair.
    #[must_use]
    pub fn listing_url(&self, dataset: u32, page: u32) -> String {
        self.listing_template
            .replace(DATASET_PLACEHOLDER, &dataset.to_string())
            .replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    /// The half-open dataset id range this crawl covers.
    #[must_use]
    pub fn dataset_range(&self) -> Range<u32> {
        self.first_dataset..self.last_dataset
    }
}

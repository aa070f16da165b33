//! Validated downloader: fetch one document, at most once, write only
//! complete validated payloads.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::client::HttpClient;
use super::error::DownloadError;
use super::validate::{ValidationRules, existing_file_valid};
use crate::crawl::DocumentSink;

/// Outcome of one document fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A valid file already sits at the destination; no network call made.
    AlreadyPresent,
    /// The body was fetched, validated, and written completely.
    Saved {
        /// Size of the written file.
        bytes: u64,
    },
    /// The body came back with a success status but is not a real document
    /// (too small or wrong magic bytes); nothing was written.
    SkippedInvalid {
        /// Observed body size.
        bytes: u64,
    },
    /// The server answered with a non-success status; nothing was written.
    HttpError {
        /// The HTTP status received.
        status: u16,
    },
    /// The fetch failed at the transport level; nothing was written.
    TransportError,
}

/// Counters across one run's downloads.
///
/// Atomic so the sink can record through `&self`; the crawl itself is
/// strictly sequential.
#[derive(Debug, Default)]
pub struct DownloadStats {
    saved: AtomicUsize,
    already_present: AtomicUsize,
    skipped_invalid: AtomicUsize,
    failed: AtomicUsize,
}

impl DownloadStats {
    /// Documents fetched, validated, and written.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.saved.load(Ordering::SeqCst)
    }

    /// Documents already satisfied on disk.
    #[must_use]
    pub fn already_present(&self) -> usize {
        self.already_present.load(Ordering::SeqCst)
    }

    /// Success-status bodies rejected by validation.
    #[must_use]
    pub fn skipped_invalid(&self) -> usize {
        self.skipped_invalid.load(Ordering::SeqCst)
    }

    /// HTTP, transport, and filesystem failures.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }
}

/// Derives the destination filename from a document URL: the trailing path
/// segment, query string excluded.
#[must_use]
pub fn document_filename(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Downloads documents with structural validation and at-most-once writes.
///
/// The destination path is deterministic
/// (`{output_root}/Dataset-{id}/{filename}`), and that determinism is the
/// dedup key: a valid file already at the path short-circuits the fetch, so
/// re-running the crawler is always safe and cheap for satisfied targets.
#[derive(Debug)]
pub struct ValidatedDownloader {
    client: HttpClient,
    output_root: PathBuf,
    rules: ValidationRules,
    stats: DownloadStats,
}

impl ValidatedDownloader {
    /// Creates a downloader writing under `output_root`.
    #[must_use]
    pub fn new(client: HttpClient, output_root: impl Into<PathBuf>, rules: ValidationRules) -> Self {
        Self {
            client,
            output_root: output_root.into(),
            rules,
            stats: DownloadStats::default(),
        }
    }

    /// Run counters so far.
    #[must_use]
    pub fn stats(&self) -> &DownloadStats {
        &self.stats
    }

    /// Destination path for one `(dataset, url)` pair.
    fn destination(&self, dataset: u32, filename: &str) -> PathBuf {
        self.output_root
            .join(format!("Dataset-{dataset}"))
            .join(filename)
    }

    /// Fetches one document with validation and an idempotent write.
    ///
    /// HTTP and transport failures are outcomes, not errors: the page's
    /// remaining downloads must continue past them.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::NoFilename`] for URLs without a usable
    /// trailing segment and [`DownloadError::Io`] when the destination
    /// directory or file cannot be written.
    #[instrument(skip(self, cookie_header), fields(url = %url, dataset))]
    pub async fn fetch(
        &self,
        url: &Url,
        dataset: u32,
        cookie_header: Option<&str>,
    ) -> Result<FetchOutcome, DownloadError> {
        let filename =
            document_filename(url).ok_or_else(|| DownloadError::no_filename(url.as_str()))?;
        let destination = self.destination(dataset, &filename);

        if existing_file_valid(&destination, &self.rules).await {
            debug!(filename, "already present, skipping fetch");
            self.stats.already_present.fetch_add(1, Ordering::SeqCst);
            return Ok(FetchOutcome::AlreadyPresent);
        }

        let response = match self.client.get(url.as_str(), cookie_header).await {
            Ok(response) => response,
            Err(e) => {
                warn!(filename, error = %e, "download failed");
                self.stats.failed.fetch_add(1, Ordering::SeqCst);
                return Ok(FetchOutcome::TransportError);
            }
        };

        if !response.is_success() {
            warn!(filename, status = response.status, "HTTP error");
            self.stats.failed.fetch_add(1, Ordering::SeqCst);
            return Ok(FetchOutcome::HttpError {
                status: response.status,
            });
        }

        let bytes = response.body.len() as u64;
        if !self.rules.is_valid(&response.body) {
            warn!(filename, bytes, "not a valid document, skipping");
            self.stats.skipped_invalid.fetch_add(1, Ordering::SeqCst);
            return Ok(FetchOutcome::SkippedInvalid { bytes });
        }

        write_complete(&destination, &response.body).await?;
        info!(filename, bytes, "saved");
        self.stats.saved.fetch_add(1, Ordering::SeqCst);
        Ok(FetchOutcome::Saved { bytes })
    }
}

/// Writes the full payload via a sibling temp file plus rename, so no
/// partial file is ever left at the destination.
async fn write_complete(destination: &Path, body: &[u8]) -> Result<(), DownloadError> {
    let parent = destination
        .parent()
        .ok_or_else(|| DownloadError::io(destination, std::io::Error::other("no parent dir")))?;
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| DownloadError::io(parent, e))?;

    let mut temp = destination.as_os_str().to_owned();
    temp.push(".part");
    let temp = PathBuf::from(temp);

    tokio::fs::write(&temp, body)
        .await
        .map_err(|e| DownloadError::io(&temp, e))?;
    tokio::fs::rename(&temp, destination)
        .await
        .map_err(|e| DownloadError::io(destination, e))?;
    Ok(())
}

#[async_trait]
impl DocumentSink for ValidatedDownloader {
    async fn deliver(&self, url: &Url, dataset: u32, cookie_header: Option<&str>) {
        if let Err(e) = self.fetch(url, dataset, cookie_header).await {
            warn!(url = %url, error = %e, "document delivery failed");
            self.stats.failed.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_document_filename_strips_query() {
        let url = Url::parse("https://host/files/doc1.pdf?itok=abc123").unwrap();
        assert_eq!(document_filename(&url).unwrap(), "doc1.pdf");
    }

    #[test]
    fn test_document_filename_plain_path() {
        let url = Url::parse("https://host/a/b/report.pdf").unwrap();
        assert_eq!(document_filename(&url).unwrap(), "report.pdf");
    }

    #[test]
    fn test_document_filename_trailing_slash_is_none() {
        let url = Url::parse("https://host/files/").unwrap();
        assert_eq!(document_filename(&url), None);
    }

    #[test]
    fn test_destination_layout() {
        let rules = ValidationRules {
            min_bytes: 1,
            magic_prefix: Vec::new(),
        };
        let client = HttpClient::from_config(&crate::config::CrawlConfig::default()).unwrap();
        let downloader = ValidatedDownloader::new(client, "/out", rules);
        assert_eq!(
            downloader.destination(7, "doc.pdf"),
            PathBuf::from("/out/Dataset-7/doc.pdf")
        );
    }
}

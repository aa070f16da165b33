//! Error types for the download module.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during document downloads.
///
/// HTTP error statuses and invalid payloads are deliberately not errors:
/// they are ordinary [`FetchOutcome`](super::FetchOutcome) variants, since
/// the crawl continues past them.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors,
    /// truncated body, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// File system error (create directory, write, rename).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The URL carries no usable trailing path segment for a filename.
    #[error("no filename derivable from URL: {url}")]
    NoFilename {
        /// The offending URL.
        url: String,
    },

    /// A configured header value is not a valid HTTP header.
    #[error("invalid {name} header in configuration: {detail}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
        /// Why the value was rejected.
        detail: String,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a no-filename error.
    pub fn no_filename(url: impl Into<String>) -> Self {
        Self::NoFilename { url: url.into() }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_includes_url() {
        let error = DownloadError::timeout("https://example.com/file.pdf");
        let msg = error.to_string();
        assert!(msg.contains("timeout"), "got: {msg}");
        assert!(msg.contains("https://example.com/file.pdf"), "got: {msg}");
    }

    #[test]
    fn test_io_display_includes_path() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = DownloadError::io(PathBuf::from("/tmp/doc.pdf"), source);
        assert!(error.to_string().contains("/tmp/doc.pdf"));
    }

    #[test]
    fn test_no_filename_display() {
        let error = DownloadError::no_filename("https://example.com/");
        assert!(error.to_string().contains("no filename"));
    }
}

//! HTTP client wrapper for document fetches.
//!
//! A thin layer over `reqwest` that installs the fixed outbound header
//! triple (User-Agent, Accept, Referer) at construction and takes the
//! session cookie header as an immutable per-request value. The whole body
//! is buffered: validation has to see the complete payload before anything
//! touches disk.

use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;
use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use tracing::{debug, instrument};

use super::error::DownloadError;
use crate::config::CrawlConfig;

/// One complete fetch: final status plus the fully buffered body.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status of the final response (after redirects).
    pub status: u16,
    /// Complete response body.
    pub body: Bytes,
}

impl FetchResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client for document downloads.
///
/// Created once per run and reused across every download, taking advantage
/// of connection pooling. Redirects are followed.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Builds a client from the crawl configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::InvalidHeader`] if a configured header
    /// value is not a valid HTTP header, or [`DownloadError::Network`]-shaped
    /// construction failure if the underlying client cannot be built.
    pub fn from_config(config: &CrawlConfig) -> Result<Self, DownloadError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, header_value("User-Agent", &config.user_agent)?);
        headers.insert(ACCEPT, header_value("Accept", &config.accept)?);
        headers.insert(REFERER, header_value("Referer", &config.referer)?);

        let client = Client::builder()
            .default_headers(headers)
            .gzip(true)
            .build()
            .map_err(|e| DownloadError::InvalidHeader {
                name: "client",
                detail: e.to_string(),
            })?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(config.download_timeout_secs),
        })
    }

    /// Fetches `url`, attaching `cookie_header` when present, and buffers
    /// the full body.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Timeout`] when the bounded timeout elapses
    /// and [`DownloadError::Network`] for any other transport failure.
    /// Non-2xx statuses are not errors; the caller inspects
    /// [`FetchResponse::status`].
    #[instrument(level = "debug", skip(self, cookie_header))]
    pub async fn get(
        &self,
        url: &str,
        cookie_header: Option<&str>,
    ) -> Result<FetchResponse, DownloadError> {
        let mut request = self.client.get(url).timeout(self.timeout);
        if let Some(cookie) = cookie_header {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await.map_err(|e| classify(url, e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| classify(url, e))?;

        debug!(url, status, bytes = body.len(), "fetch complete");
        Ok(FetchResponse { status, body })
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, DownloadError> {
    HeaderValue::from_str(value).map_err(|e| DownloadError::InvalidHeader {
        name,
        detail: e.to_string(),
    })
}

fn classify(url: &str, error: reqwest::Error) -> DownloadError {
    if error.is_timeout() {
        DownloadError::timeout(url)
    } else {
        DownloadError::network(url, error)
    }
}

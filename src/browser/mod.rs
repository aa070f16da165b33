//! Headless-browser driver seam.
//!
//! The crawl layer talks to the browser exclusively through the
//! [`BrowserPage`] trait, so pagination, challenge handling, and link
//! extraction can be exercised against a scripted fake in tests. The
//! production implementation lives in [`chromium`] and drives a headless
//! Chromium over CDP.

pub mod chromium;

use async_trait::async_trait;
use thiserror::Error;

pub use chromium::{ChromiumPage, launch_browser};

/// HTTP status the site uses to signal that a dataset has no more pages.
pub const STATUS_NOT_FOUND: u16 = 404;

/// Errors surfaced by the browser driver.
///
/// Everything the driver can fail with is collapsed into transport-shaped
/// variants: the crawl layer only distinguishes "this navigation is dead"
/// from "this probe failed", never the CDP-level cause.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Navigation failed before a response was obtained (timeout, DNS
    /// failure, connection reset, driver disconnect).
    #[error("navigation failed for {url}: {detail}")]
    Navigation {
        /// The URL that failed to load.
        url: String,
        /// Driver-reported failure detail.
        detail: String,
    },

    /// A DOM query, script evaluation, or cookie read failed.
    #[error("page operation '{operation}' failed: {detail}")]
    Page {
        /// The operation that failed (selector, script, etc.).
        operation: String,
        /// Driver-reported failure detail.
        detail: String,
    },
}

impl BrowserError {
    /// Creates a navigation error.
    pub fn navigation(url: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            detail: detail.into(),
        }
    }

    /// Creates a page-operation error.
    pub fn page(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Page {
            operation: operation.into(),
            detail: detail.into(),
        }
    }
}

/// One cookie held by the browser context.
///
/// Only name and value survive the bridge into the download client; domain
/// and path scoping stay the browser's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
}

impl BrowserCookie {
    /// Creates a cookie from name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Driver-facing contract for one browser tab.
///
/// Implementations must make every method safe to call repeatedly; the
/// crawl layer re-probes selectors and re-issues navigations as part of
/// challenge clearing.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Navigates to `url`, waiting for the content-loaded condition, and
    /// returns the main document's HTTP status.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Navigation`] on any transport-level failure.
    async fn goto(&self, url: &str) -> Result<u16, BrowserError>;

    /// Returns whether at least one element matches `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Page`] if the query cannot be issued.
    async fn exists(&self, selector: &str) -> Result<bool, BrowserError>;

    /// Collects `attribute` from every element matching `selector`, in
    /// document order. Elements without the attribute are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Page`] if the query cannot be issued.
    async fn collect_attribute(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<String>, BrowserError>;

    /// Clicks the first element matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Page`] if no element matches or the click
    /// cannot be dispatched.
    async fn click(&self, selector: &str) -> Result<(), BrowserError>;

    /// Evaluates a script in the page.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Page`] if evaluation fails.
    async fn evaluate(&self, script: &str) -> Result<(), BrowserError>;

    /// Waits until the page reaches its content-loaded state again, e.g.
    /// after an in-page script triggered a reload.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Page`] if the wait cannot complete.
    async fn wait_for_load(&self) -> Result<(), BrowserError>;

    /// Snapshot of all cookies currently held by the browser context.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Page`] if the cookie read fails.
    async fn cookies(&self) -> Result<Vec<BrowserCookie>, BrowserError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_error_display_includes_url() {
        let error = BrowserError::navigation("http://example.com/page", "timed out");
        let msg = error.to_string();
        assert!(msg.contains("http://example.com/page"), "got: {msg}");
        assert!(msg.contains("timed out"), "got: {msg}");
    }

    #[test]
    fn test_page_error_display_includes_operation() {
        let error = BrowserError::page("find_elements", "node not found");
        let msg = error.to_string();
        assert!(msg.contains("find_elements"), "got: {msg}");
    }
}

//! Pagination controller: the per-dataset listing loop.
//!
//! The source declares no total page count, so termination is implicit: a
//! page yielding no document links, or exactly the link set of the page
//! before it, ends the dataset. That predicate is named and exported
//! ([`pagination_complete`]) rather than inlined, and the comparison runs
//! on trailing-path-segment names with the query string stripped, so
//! query-string churn across re-fetches of the same content cannot defeat
//! duplicate detection.

use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::extract::extract_document_links;
use super::navigator::navigate_with_challenges;
use super::session::cookie_header;
use crate::browser::BrowserPage;
use crate::config::CrawlConfig;

/// Receiver for the documents a listing page yields.
///
/// The production implementation is the validated downloader; tests plug in
/// a recorder. Delivery must not fail the page: implementations absorb and
/// report their own per-document failures.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Handles one extracted document URL for `dataset`, with the cookie
    /// header snapshotted after the page's navigation settled.
    async fn deliver(&self, url: &Url, dataset: u32, cookie_header: Option<&str>);
}

/// Termination predicate for the listing loop.
///
/// A dataset is exhausted when a page yields no links, or repeats the
/// immediately preceding page's link-name set exactly.
#[must_use]
pub fn pagination_complete(current: &HashSet<String>, previous: &HashSet<String>) -> bool {
    current.is_empty() || current == previous
}

/// Reduces extracted links to their trailing-path-segment names.
///
/// The query string never reaches the name (it is not part of the URL
/// path), which is what makes page-to-page comparison stable when the site
/// re-signs its links on every render.
#[must_use]
pub fn link_names<'a>(links: impl IntoIterator<Item = &'a Url>) -> HashSet<String> {
    links
        .into_iter()
        .filter_map(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back())
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        })
        .collect()
}

/// Drives one dataset's listing pages in strictly increasing index order.
pub struct PaginationController<'a> {
    page: &'a dyn BrowserPage,
    sink: &'a dyn DocumentSink,
    config: &'a CrawlConfig,
}

impl<'a> PaginationController<'a> {
    /// Creates a controller over one browser tab and one document sink.
    #[must_use]
    pub fn new(
        page: &'a dyn BrowserPage,
        sink: &'a dyn DocumentSink,
        config: &'a CrawlConfig,
    ) -> Self {
        Self { page, sink, config }
    }

    /// Runs the listing loop for `dataset` until termination.
    ///
    /// Returns the number of listing-page navigations issued. All failure
    /// modes terminate the loop rather than propagate: a 404 or transport
    /// error stops the dataset, a failed extraction reads as an empty page,
    /// and a single document's delivery failure is the sink's to absorb.
    #[instrument(skip(self))]
    pub async fn run_dataset(&self, dataset: u32) -> u32 {
        let mut previous: HashSet<String> = HashSet::new();
        let mut page_index: u32 = 0;
        let mut pages_requested: u32 = 0;

        loop {
            let url = self.config.listing_url(dataset, page_index);
            pages_requested += 1;

            let nav = match navigate_with_challenges(self.page, &url).await {
                Ok(nav) => nav,
                Err(e) => {
                    warn!(url, error = %e, "navigation failed, terminating dataset");
                    break;
                }
            };
            if nav.is_not_found() {
                debug!(url, "end of dataset (404)");
                break;
            }

            let links = match extract_document_links(
                self.page,
                &self.config.file_pattern,
                &self.config.site_root,
            )
            .await
            {
                Ok(links) => links,
                Err(e) => {
                    // An unreadable page is indistinguishable from an empty
                    // one at this layer.
                    warn!(url, error = %e, "extraction failed, treating page as empty");
                    Vec::new()
                }
            };

            let current = link_names(&links);
            if pagination_complete(&current, &previous) {
                debug!(
                    url,
                    links = current.len(),
                    "pagination complete (empty or duplicate page)"
                );
                break;
            }

            // Page transition settled: bridge the session into the download
            // client before this page's documents are fetched.
            let header = match self.page.cookies().await {
                Ok(cookies) => cookie_header(&cookies),
                Err(e) => {
                    warn!(error = %e, "cookie snapshot failed, downloading without session");
                    None
                }
            };

            info!(dataset, page = page_index, links = links.len(), "downloading page links");
            for link in &links {
                self.sink.deliver(link, dataset, header.as_deref()).await;
            }

            previous = current;
            page_index += 1;
        }

        pages_requested
    }
}

//! Dataset crawler: sequential orchestration across the dataset range.

use tracing::{info, instrument};

use super::pagination::{DocumentSink, PaginationController};
use crate::browser::BrowserPage;
use crate::config::CrawlConfig;

/// Aggregate counters for one crawl run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlStats {
    /// Datasets whose listing loop ran to termination.
    pub datasets: u32,
    /// Listing-page navigations issued across all datasets.
    pub pages_requested: u32,
}

/// Walks every dataset in the configured range, one pagination loop each.
///
/// Traversal is strictly sequential: dataset N+1 begins only after dataset
/// N's loop terminates, and within a dataset pages are visited in
/// increasing index order. A dataset that dies early (404, transport
/// error) never affects the ones after it.
pub struct DatasetCrawler<'a> {
    page: &'a dyn BrowserPage,
    sink: &'a dyn DocumentSink,
    config: &'a CrawlConfig,
}

impl<'a> DatasetCrawler<'a> {
    /// Creates a crawler over one browser tab and one document sink.
    #[must_use]
    pub fn new(
        page: &'a dyn BrowserPage,
        sink: &'a dyn DocumentSink,
        config: &'a CrawlConfig,
    ) -> Self {
        Self { page, sink, config }
    }

    /// Runs the full crawl and returns aggregate counters.
    #[instrument(skip(self))]
    pub async fn run(&self) -> CrawlStats {
        let controller = PaginationController::new(self.page, self.sink, self.config);
        let mut stats = CrawlStats::default();

        for dataset in self.config.dataset_range() {
            info!(dataset, "checking source");
            let pages = controller.run_dataset(dataset).await;
            stats.datasets += 1;
            stats.pages_requested += pages;
            info!(dataset, pages, "dataset complete");
        }

        stats
    }
}

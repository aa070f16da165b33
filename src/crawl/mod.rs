//! Crawl pipeline: challenge clearing, navigation, link extraction,
//! pagination, and per-dataset orchestration.
//!
//! The flow per dataset is a strict sequence: navigate one listing page
//! (clearing any bot check or age gate on the way), extract the document
//! links, decide continuation from the link set, snapshot the browser
//! cookies, then hand each link to the document sink in page order.

mod challenge;
mod crawler;
mod extract;
mod navigator;
mod pagination;
mod session;

pub use challenge::{ClearOutcome, clear_age_gate, clear_robot_check};
pub use crawler::{CrawlStats, DatasetCrawler};
pub use extract::extract_document_links;
pub use navigator::{NavOutcome, navigate_with_challenges};
pub use pagination::{
    DocumentSink, PaginationController, link_names, pagination_complete,
};
pub use session::cookie_header;

//! Link extractor: document links from a navigated listing page.

use tracing::warn;
use url::Url;

use crate::browser::{BrowserError, BrowserPage};

/// Extracts document links matching `file_pattern` from the current page.
///
/// Matches every anchor whose href contains the pattern anywhere
/// (permissive substring semantics, e.g. `.pdf`). Hrefs already carrying a
/// scheme are used as-is; all others, relative paths included, are resolved
/// against `site_root`. Document order is preserved and no matching href is
/// skipped; hrefs that still fail to parse as URLs are dropped with a
/// warning.
///
/// # Errors
///
/// Returns [`BrowserError::Page`] if the DOM query fails.
pub async fn extract_document_links(
    page: &dyn BrowserPage,
    file_pattern: &str,
    site_root: &str,
) -> Result<Vec<Url>, BrowserError> {
    let selector = format!("a[href*='{file_pattern}']");
    let hrefs = page.collect_attribute(&selector, "href").await?;

    let base = Url::parse(site_root)
        .map_err(|e| BrowserError::page("parse site root", e.to_string()))?;

    let mut links = Vec::with_capacity(hrefs.len());
    for href in hrefs {
        let href = href.trim();
        let parsed = if href.starts_with("http://") || href.starts_with("https://") {
            Url::parse(href)
        } else {
            base.join(href)
        };
        match parsed {
            Ok(url) => links.push(url),
            Err(e) => warn!(href, error = %e, "dropping unparseable href"),
        }
    }
    Ok(links)
}

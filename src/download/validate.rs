//! Structural validation of document payloads.
//!
//! The unauthenticated fallback of the site returns HTML error pages and
//! redirect stubs with a 200 status; size and magic-prefix checks are what
//! keep those out of the output tree. The same rules apply to freshly
//! fetched bodies and to files already on disk.

use std::path::Path;

use tokio::io::AsyncReadExt;

use crate::config::CrawlConfig;

/// Thresholds a payload must meet to count as a real document.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    /// Minimum byte length.
    pub min_bytes: u64,
    /// Required leading bytes.
    pub magic_prefix: Vec<u8>,
}

impl ValidationRules {
    /// Extracts the validation thresholds from the crawl configuration.
    #[must_use]
    pub fn from_config(config: &CrawlConfig) -> Self {
        Self {
            min_bytes: config.min_document_bytes,
            magic_prefix: config.magic_prefix.clone(),
        }
    }

    /// Whether an in-memory payload is structurally valid.
    #[must_use]
    pub fn is_valid(&self, bytes: &[u8]) -> bool {
        bytes.len() as u64 >= self.min_bytes && bytes.starts_with(&self.magic_prefix)
    }
}

/// Whether a pre-existing file passes the same validation applied to
/// fetched bodies.
///
/// A missing, short, or wrong-prefix file reports `false`; only the magic
/// prefix is read from disk, not the whole file.
pub async fn existing_file_valid(path: &Path, rules: &ValidationRules) -> bool {
    let Ok(metadata) = tokio::fs::metadata(path).await else {
        return false;
    };
    if !metadata.is_file() || metadata.len() < rules.min_bytes {
        return false;
    }
    if rules.magic_prefix.is_empty() {
        return true;
    }

    let Ok(mut file) = tokio::fs::File::open(path).await else {
        return false;
    };
    let mut header = vec![0u8; rules.magic_prefix.len()];
    match file.read_exact(&mut header).await {
        Ok(_) => header == rules.magic_prefix,
        Err(_) => false,
    }
}

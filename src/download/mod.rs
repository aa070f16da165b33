//! Validated HTTP download.
//!
//! [`HttpClient`] performs one bounded fetch with the fixed outbound header
//! triple plus a per-request cookie snapshot; [`ValidatedDownloader`] wraps
//! it with structural validation and an idempotent, at-most-once write to a
//! deterministic destination path.

mod client;
mod error;
mod fetch;
mod validate;

pub use client::{FetchResponse, HttpClient};
pub use error::DownloadError;
pub use fetch::{DownloadStats, FetchOutcome, ValidatedDownloader, document_filename};
pub use validate::{ValidationRules, existing_file_valid};

//! Manifest-driven integrity verification.
//!
//! Walks a plain-text manifest of `"{md5-hex}  {relative-path}"` lines and
//! confirms the on-disk artifact set matches. The verifier never stops
//! early: every entry is checked and reported, and the aggregate fails if
//! any single entry does.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use md5::{Digest, Md5};
use thiserror::Error;
use tracing::{debug, instrument};

/// Chunk size for streaming file hashing.
const HASH_CHUNK_BYTES: usize = 4096;

/// Errors that abort verification before any entries are checked.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The manifest file itself does not exist.
    #[error("manifest {path} not found")]
    ManifestNotFound {
        /// The manifest path that was looked up.
        path: PathBuf,
    },

    /// I/O error reading the manifest.
    #[error("failed to read manifest {path}: {source}")]
    Io {
        /// The manifest path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Per-entry verification status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// File exists and its digest matches.
    Pass,
    /// File exists but its digest differs.
    Fail,
    /// File does not exist.
    Missing,
}

/// One checked manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    /// Status of the check.
    pub status: EntryStatus,
    /// The entry's relative path, as resolved on the host.
    pub path: PathBuf,
}

/// Full verification result, one report per manifest entry.
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// Per-entry reports in manifest order.
    pub entries: Vec<EntryReport>,
}

impl VerifyReport {
    /// Whether every entry passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.entries
            .iter()
            .all(|entry| entry.status == EntryStatus::Pass)
    }
}

/// Splits one manifest line into `(expected_hash, relative_path)` at the
/// first whitespace run. Blank lines yield `None`.
#[must_use]
pub fn parse_manifest_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let split_at = line.find(char::is_whitespace)?;
    let (hash, rest) = line.split_at(split_at);
    Some((hash, rest.trim_start()))
}

/// Resolves a manifest-relative path (always `/`-separated) against `root`
/// using the host path convention.
fn resolve_entry_path(root: &Path, relative: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for component in relative.split('/').filter(|c| !c.is_empty()) {
        path.push(component);
    }
    path
}

/// Streams a file through MD5 and returns the lowercase hex digest.
fn hash_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut chunk = [0u8; HASH_CHUNK_BYTES];
    loop {
        let read = file.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        hasher.update(&chunk[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Verifies every manifest entry against the files under `root`.
///
/// Entries are checked in manifest order and all of them are checked
/// regardless of earlier failures. The digest comparison is case-sensitive
/// against lowercase hex. Unreadable files report as [`EntryStatus::Fail`].
///
/// # Errors
///
/// Returns [`VerifyError::ManifestNotFound`] if the manifest does not
/// exist, or [`VerifyError::Io`] if it cannot be read. Per-entry problems
/// never error; they land in the report.
#[instrument(skip(root), fields(manifest = %manifest.display()))]
pub fn verify_manifest(root: &Path, manifest: &Path) -> Result<VerifyReport, VerifyError> {
    if !manifest.exists() {
        return Err(VerifyError::ManifestNotFound {
            path: manifest.to_path_buf(),
        });
    }

    let file = File::open(manifest).map_err(|source| VerifyError::Io {
        path: manifest.to_path_buf(),
        source,
    })?;

    let mut report = VerifyReport::default();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|source| VerifyError::Io {
            path: manifest.to_path_buf(),
            source,
        })?;
        let Some((expected, relative)) = parse_manifest_line(&line) else {
            continue;
        };

        let full_path = resolve_entry_path(root, relative);
        let status = if full_path.exists() {
            match hash_file(&full_path) {
                Ok(actual) if actual == expected => EntryStatus::Pass,
                Ok(actual) => {
                    debug!(path = %full_path.display(), expected, actual, "digest mismatch");
                    EntryStatus::Fail
                }
                Err(e) => {
                    debug!(path = %full_path.display(), error = %e, "unreadable file");
                    EntryStatus::Fail
                }
            }
        } else {
            EntryStatus::Missing
        };

        report.entries.push(EntryReport {
            status,
            path: PathBuf::from(relative),
        });
    }

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest_line_double_space() {
        let (hash, path) = parse_manifest_line("d41d8cd98f00b204e9800998ecf8427e  a/b.txt").unwrap();
        assert_eq!(hash, "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(path, "a/b.txt");
    }

    #[test]
    fn test_parse_manifest_line_single_space_and_tabs() {
        let (hash, path) = parse_manifest_line("abc123 x.pdf").unwrap();
        assert_eq!((hash, path), ("abc123", "x.pdf"));

        let (hash, path) = parse_manifest_line("abc123\t\tDataset-0/y.pdf").unwrap();
        assert_eq!((hash, path), ("abc123", "Dataset-0/y.pdf"));
    }

    #[test]
    fn test_parse_manifest_line_path_with_spaces() {
        let (_, path) =
            parse_manifest_line("abc123  Dataset Files/doc one.pdf").unwrap();
        assert_eq!(path, "Dataset Files/doc one.pdf");
    }

    #[test]
    fn test_parse_manifest_line_blank_is_none() {
        assert_eq!(parse_manifest_line(""), None);
        assert_eq!(parse_manifest_line("   \t"), None);
    }

    #[test]
    fn test_parse_manifest_line_hash_only_is_none() {
        assert_eq!(parse_manifest_line("d41d8cd98f00b204e9800998ecf8427e"), None);
    }

    #[test]
    fn test_hash_file_empty_is_known_md5_vector() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();
        assert_eq!(
            hash_file(&path).unwrap(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
    }

    #[test]
    fn test_hash_file_streams_across_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.bin");
        // Larger than one hash chunk so the streaming loop iterates.
        std::fs::write(&path, vec![b'a'; HASH_CHUNK_BYTES * 3 + 17]).unwrap();
        let digest = hash_file(&path).unwrap();
        assert_eq!(digest.len(), 32);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_resolve_entry_path_splits_on_forward_slash() {
        let resolved = resolve_entry_path(Path::new("/root"), "a/b/c.pdf");
        assert_eq!(resolved, Path::new("/root").join("a").join("b").join("c.pdf"));
    }
}

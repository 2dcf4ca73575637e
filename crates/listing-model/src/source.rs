//! Listing Ingestion from JSON

use crate::RawListing;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors while reading listing sources
#[derive(Debug, Error)]
pub enum SourceError {
    /// Filesystem failure
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON payload
    #[error("Invalid listing JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of loading a directory of crawled listings
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Unique listings, in sorted file path order
    pub listings: Vec<RawListing>,
    /// Number of listings kept
    pub loaded: usize,
    /// Listings skipped (empty or duplicate id)
    pub skipped: usize,
    /// Files that could not be read or parsed
    pub failed: usize,
}

/// Parse a JSON array of listings (the `/crawl-cars` response body)
pub fn listings_from_json(text: &str) -> Result<Vec<RawListing>, SourceError> {
    Ok(serde_json::from_str(text)?)
}

/// Load every `*.json` file below `dir`, one listing per file
pub fn load_dir(dir: impl AsRef<Path>) -> Result<LoadReport, SourceError> {
    let dir = dir.as_ref();
    let mut files = Vec::new();
    collect_json_files(dir, &mut files)?;
    files.sort();

    debug!("Found {} JSON files under {}", files.len(), dir.display());

    let mut report = LoadReport::default();
    let mut seen = HashSet::new();

    for path in files {
        let listing = match read_listing(&path) {
            Ok(listing) => listing,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                report.failed += 1;
                continue;
            }
        };

        if listing.id.is_empty() || !seen.insert(listing.id.clone()) {
            report.skipped += 1;
            continue;
        }

        report.listings.push(listing);
    }

    report.loaded = report.listings.len();
    info!(
        "Loaded {} listings from {} (skipped {}, failed {})",
        report.loaded,
        dir.display(),
        report.skipped,
        report.failed
    );

    Ok(report)
}

fn read_listing(path: &Path) -> Result<RawListing, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), SourceError> {
    let io_err = |source| SourceError::Io {
        path: dir.to_path_buf(),
        source,
    };

    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}

//! Download planning.
//!
//! `PlanBuilder` consumes listing entries in listing order and produces the
//! `DownloadPlan`: which files to fetch, their content hashes, and whether
//! the repository is a fine-tuning adapter.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::format::{FileFormat, is_adapter_path};

/// Algorithm of the content hashes reported for large-file tracked entries.
pub const LFS_HASH_ALGORITHM: &str = "sha256";

// ============================================================================
// Content Hash
// ============================================================================

/// Content-addressed hash of a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash {
    /// Hash algorithm identifier (e.g., `sha256`)
    pub algorithm: String,
    /// Lowercase hex digest
    pub digest: String,
}

impl ContentHash {
    /// Create a sha256 content hash.
    pub fn sha256(digest: impl Into<String>) -> Self {
        Self {
            algorithm: LFS_HASH_ALGORITHM.to_string(),
            digest: digest.into(),
        }
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.digest)
    }
}

// ============================================================================
// Listing Entry (planner input)
// ============================================================================

/// One entry of a remote directory listing, independent of the listing API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Path relative to repository root
    pub path: String,
    /// File size in bytes (0 when unknown)
    pub size: u64,
    /// Hash reported when the file is stored via large-file tracking
    pub content_hash: Option<ContentHash>,
}

impl ListingEntry {
    /// Create an entry without large-file tracking.
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            content_hash: None,
        }
    }

    /// Attach a large-file content hash.
    #[must_use]
    pub fn with_content_hash(mut self, hash: ContentHash) -> Self {
        self.content_hash = Some(hash);
        self
    }
}

// ============================================================================
// File Entry / Download Plan
// ============================================================================

/// A classified file selected for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to repository root
    pub path: String,
    /// Format classification (never `Unclassified`)
    pub format: FileFormat,
    /// File size in bytes as reported by the listing (0 when unknown)
    pub size: u64,
    /// Content hash when the file is stored via large-file tracking
    pub content_hash: Option<ContentHash>,
    /// Fully resolved download URL
    pub url: String,
}

impl FileEntry {
    /// Get the filename without directories.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// A recorded `(path, hash)` pair from the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRecord {
    /// Path relative to repository root
    pub path: String,
    /// The recorded hash
    pub hash: ContentHash,
}

/// Output of listing resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadPlan {
    /// Files to download, in listing order after filtering.
    pub files: Vec<FileEntry>,
    /// Hashes of every classified large-file entry, including entries that
    /// were filtered out of `files`.
    pub hashes: Vec<HashRecord>,
    /// True if any entry follows the adapter naming convention.
    pub is_adapter: bool,
}

impl DownloadPlan {
    /// Download URLs in plan order.
    pub fn urls(&self) -> Vec<String> {
        self.files.iter().map(|f| f.url.clone()).collect()
    }

    /// Look up the recorded hash of a path.
    pub fn hash_for(&self, path: &str) -> Option<&ContentHash> {
        self.hashes
            .iter()
            .find(|record| record.path == path)
            .map(|record| &record.hash)
    }

    /// Whether the plan selects no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of listing-reported sizes of the selected files.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

// ============================================================================
// Plan Builder
// ============================================================================

/// Incrementally builds a `DownloadPlan` from listing entries.
///
/// Entries can be pushed page by page; filtering that depends on the whole
/// listing (safetensors precedence) happens in `finish`.
#[derive(Debug, Default)]
pub struct PlanBuilder {
    text_only: bool,
    selected: Vec<(ListingEntry, FileFormat)>,
    hashes: Vec<HashRecord>,
    is_adapter: bool,
}

impl PlanBuilder {
    /// Create a builder. With `text_only`, only text and tokenizer files are kept.
    pub fn new(text_only: bool) -> Self {
        Self {
            text_only,
            ..Self::default()
        }
    }

    /// Feed one listing entry.
    pub fn push(&mut self, entry: ListingEntry) {
        if !self.is_adapter && is_adapter_path(&entry.path) {
            self.is_adapter = true;
        }

        let format = FileFormat::classify(&entry.path);
        if format == FileFormat::Unclassified {
            return;
        }

        if let Some(hash) = &entry.content_hash {
            self.hashes.push(HashRecord {
                path: entry.path.clone(),
                hash: hash.clone(),
            });
        }

        if format.is_text_like() || !self.text_only {
            self.selected.push((entry, format));
        }
    }

    /// Feed several listing entries.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = ListingEntry>) {
        for entry in entries {
            self.push(entry);
        }
    }

    /// Apply format precedence and resolve download URLs.
    pub fn finish(self, url_for: impl Fn(&str) -> String) -> DownloadPlan {
        let has_safetensors = self
            .selected
            .iter()
            .any(|(_, format)| *format == FileFormat::Safetensors);
        let has_superseded = self
            .selected
            .iter()
            .any(|(_, format)| format.is_superseded_by_safetensors());
        let drop_superseded = has_safetensors && has_superseded;

        let files = self
            .selected
            .into_iter()
            .filter(|(_, format)| !(drop_superseded && format.is_superseded_by_safetensors()))
            .map(|(entry, format)| FileEntry {
                url: url_for(&entry.path),
                path: entry.path,
                format,
                size: entry.size,
                content_hash: entry.content_hash,
            })
            .collect();

        DownloadPlan {
            files,
            hashes: self.hashes,
            is_adapter: self.is_adapter,
        }
    }
}

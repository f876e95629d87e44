//! Internal API response types for the listing API.
//!
//! These types are internal to `modelfetch-hf` and are not exposed to
//! consumers. External consumers see `ListingEntry` from `modelfetch-core`.

use std::time::Duration;

use modelfetch_core::{ContentHash, ListingEntry};
use serde::Deserialize;
use url::Url;

use crate::config::HfClientConfig;
use crate::error::HfResult;

// ============================================================================
// Configuration (used internally, see config.rs for public config)
// ============================================================================

/// Internal configuration for the listing client, with URLs already parsed.
#[derive(Debug, Clone)]
pub struct HfConfig {
    /// Base URL of the listing API
    pub api_base: Url,
    /// Base URL of the raw file endpoint
    pub download_base: Url,
    /// User agent sent with every request
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Optional authentication token for private models
    pub token: Option<String>,
    /// Maximum number of retry attempts for transient errors
    pub max_retries: u8,
    /// Base delay in milliseconds for exponential backoff
    pub retry_base_delay_ms: u64,
    /// Cap on listing pages fetched per resolution
    pub max_pages: u32,
}

impl HfConfig {
    /// Derive the internal configuration from the public one.
    pub fn from_public(config: &HfClientConfig) -> HfResult<Self> {
        Ok(Self {
            api_base: parse_base(&config.api_base)?,
            download_base: parse_base(&config.download_base)?,
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            token: config.token.clone(),
            max_retries: config.max_retries,
            #[allow(clippy::cast_possible_truncation)] // Duration milliseconds won't exceed u64 in practice
            retry_base_delay_ms: config.retry_base_delay.as_millis() as u64,
            max_pages: config.max_pages,
        })
    }
}

/// Parse a base URL that path segments can be appended to.
fn parse_base(raw: &str) -> HfResult<Url> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
    }
    Ok(url)
}

// ============================================================================
// Tree Listing Entry
// ============================================================================

/// Large-file pointer attached to an LFS-tracked tree entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LfsPointer {
    /// sha256 of the file contents
    pub oid: String,
    /// Actual file size
    #[serde(default)]
    pub size: Option<u64>,
}

/// One entry of `GET /{model}/tree/{branch}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    /// Entry type ("file" or "directory")
    #[serde(rename = "type", default)]
    pub entry_type: Option<String>,
    /// Path relative to repository root
    pub path: String,
    /// Size in bytes
    #[serde(default)]
    pub size: Option<u64>,
    /// Large-file pointer, present for LFS-tracked files
    #[serde(default)]
    pub lfs: Option<LfsPointer>,
}

impl TreeEntry {
    /// Convert into the listing-agnostic planner input.
    ///
    /// The LFS size wins over the pointer size when both are present.
    pub fn into_listing_entry(self) -> ListingEntry {
        let size = self
            .lfs
            .as_ref()
            .and_then(|lfs| lfs.size)
            .or(self.size)
            .unwrap_or(0);
        let entry = ListingEntry::new(self.path, size);
        match self.lfs {
            Some(lfs) => entry.with_content_hash(ContentHash::sha256(lfs.oid)),
            None => entry,
        }
    }
}

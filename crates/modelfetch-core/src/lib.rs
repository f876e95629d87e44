#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod download;
pub mod error;
pub mod format;
pub mod options;
pub mod plan;
pub mod ports;
pub mod repo;

// Re-export commonly used types for convenience
pub use download::{DownloadOutcome, DownloadResult, ProgressEvent, TaskState};
pub use error::{FetchError, FetchResult};
pub use format::{FileFormat, is_adapter_path};
pub use options::{DEFAULT_MAX_PAGES, DEFAULT_THREADS, DEFAULT_TIMEOUT, FetchOptions};
pub use plan::{ContentHash, DownloadPlan, FileEntry, HashRecord, ListingEntry, PlanBuilder};
pub use ports::ListingResolverPort;
pub use repo::{Branch, RepoRef};

// Dev-dependency used only by serialization tests
#[cfg(test)]
use serde_json as _;

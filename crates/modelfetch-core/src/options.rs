//! Caller-facing option set.
//!
//! `FetchOptions` replaces global argument state: the CLI builds one value
//! and passes it explicitly to the resolver and the engine.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::FetchResult;
use crate::repo::{Branch, RepoRef};

/// Default number of files downloaded simultaneously.
pub const DEFAULT_THREADS: usize = 1;

/// Default timeout applied to each network operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default cap on listing pages fetched for one resolution.
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Options for one fetch of a model.
///
/// # Example
///
/// ```
/// use modelfetch_core::FetchOptions;
///
/// let options = FetchOptions::new("facebook/opt-1.3b", "main")
///     .unwrap()
///     .with_threads(4)
///     .with_text_only(true);
/// assert_eq!(options.threads, 4);
/// ```
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Repository to fetch.
    pub model: RepoRef,
    /// Branch to fetch from.
    pub branch: Branch,
    /// Only fetch text and tokenizer files.
    pub text_only: bool,
    /// Ignore partial files and download from scratch.
    pub clean: bool,
    /// Number of files downloaded simultaneously (at least 1).
    pub threads: usize,
    /// Output directory override.
    pub output: Option<PathBuf>,
    /// Verify sha256 checksums after downloading.
    pub check: bool,
    /// Timeout applied to each network operation.
    pub timeout: Duration,
    /// Cap on listing pages fetched.
    pub max_pages: u32,
    /// Bearer token for private or gated repositories.
    pub token: Option<String>,
}

impl FetchOptions {
    /// Validate the model id and branch and create options with defaults.
    pub fn new(model_id: &str, branch: &str) -> FetchResult<Self> {
        Ok(Self {
            model: RepoRef::parse(model_id)?,
            branch: Branch::parse(branch)?,
            text_only: false,
            clean: false,
            threads: DEFAULT_THREADS,
            output: None,
            check: false,
            timeout: DEFAULT_TIMEOUT,
            max_pages: DEFAULT_MAX_PAGES,
            token: None,
        })
    }

    /// Only fetch text and tokenizer files.
    #[must_use]
    pub const fn with_text_only(mut self, text_only: bool) -> Self {
        self.text_only = text_only;
        self
    }

    /// Do not resume partial downloads.
    #[must_use]
    pub const fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    /// Set the number of concurrent downloads. Zero is raised to one.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Set the output directory override.
    #[must_use]
    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }

    /// Verify checksums after downloading.
    #[must_use]
    pub const fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Set the per-operation network timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the listing page cap. Zero is raised to one.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Set the bearer token. Empty tokens are treated as absent.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }
}

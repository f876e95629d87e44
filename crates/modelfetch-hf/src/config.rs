//! Public configuration for the listing client.
//!
//! This module provides a stable public API for configuring the client.
//! The internal config is derived from this.

use std::time::Duration;

use modelfetch_core::{DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT};

/// Configuration for the `HuggingFace` listing client.
///
/// Use the builder pattern methods to customize the client configuration.
///
/// # Example
///
/// ```
/// use modelfetch_hf::HfClientConfig;
/// use std::time::Duration;
///
/// let config = HfClientConfig::new()
///     .with_timeout(Duration::from_secs(60))
///     .with_max_pages(20)
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct HfClientConfig {
    /// Base URL of the listing API
    pub(crate) api_base: String,
    /// Base URL of the raw file endpoint
    pub(crate) download_base: String,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
    /// Request timeout
    pub(crate) timeout: Duration,
    /// Optional authentication token for private models
    pub(crate) token: Option<String>,
    /// Maximum number of retry attempts for transient errors
    pub(crate) max_retries: u8,
    /// Base delay for exponential backoff
    pub(crate) retry_base_delay: Duration,
    /// Cap on listing pages fetched per resolution
    pub(crate) max_pages: u32,
}

impl Default for HfClientConfig {
    fn default() -> Self {
        Self {
            api_base: "https://huggingface.co/api/models".to_string(),
            download_base: "https://huggingface.co".to_string(),
            user_agent: concat!("modelfetch-hf/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: DEFAULT_TIMEOUT,
            token: None,
            max_retries: 3,
            retry_base_delay: Duration::from_millis(500),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl HfClientConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL of the listing API.
    ///
    /// Defaults to `https://huggingface.co/api/models`.
    #[must_use]
    pub fn with_api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// Set the base URL used to build file download URLs.
    ///
    /// Defaults to `https://huggingface.co`.
    #[must_use]
    pub fn with_download_base(mut self, url: impl Into<String>) -> Self {
        self.download_base = url.into();
        self
    }

    /// Set the user agent string for HTTP requests.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set an authentication token for accessing private models.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set an optional authentication token.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Set the maximum number of retry attempts for transient errors.
    ///
    /// Defaults to 3 retries.
    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay for exponential backoff retries.
    ///
    /// Defaults to 500ms.
    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Set the maximum number of listing pages fetched per resolution.
    ///
    /// Defaults to 100. Zero is raised to one.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }
}

//! Engine configuration.

use std::time::Duration;

use modelfetch_core::DEFAULT_TIMEOUT;

/// Default size of the slices a response body is written in.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Suggested capacity for the progress channel handed to the engine.
pub const DEFAULT_PROGRESS_CAPACITY: usize = 1024;

/// Configuration for the download engine.
///
/// # Example
///
/// ```
/// use modelfetch_download::EngineConfig;
/// use std::time::Duration;
///
/// let config = EngineConfig::new()
///     .with_timeout(Duration::from_secs(10))
///     .with_chunk_size(64 * 1024);
/// assert_eq!(config.chunk_size(), 64 * 1024);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub(crate) timeout: Duration,
    pub(crate) connect_timeout: Duration,
    pub(crate) chunk_size: usize,
    pub(crate) token: Option<String>,
    pub(crate) user_agent: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_TIMEOUT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            token: None,
            user_agent: concat!("modelfetch-download/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Timeout applied to issuing a request and to each chunk read.
    ///
    /// This bounds stalls, not the total transfer time.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Timeout for establishing a connection.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Size of the slices the body is written and reported in. Zero is raised to one.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Bearer token sent with every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Optional bearer token.
    #[must_use]
    pub fn with_optional_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// User agent sent with every request.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Per-operation timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Body slice size.
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

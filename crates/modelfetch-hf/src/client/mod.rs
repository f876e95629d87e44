//! Listing client for the Hugging Face Hub.
//!
//! This module provides the main client interface; resolution itself lives
//! in `listing`.

mod listing;

use crate::config::HfClientConfig;
use crate::error::HfResult;
use crate::http::{HttpBackend, ReqwestBackend};
use crate::models::HfConfig;

// ============================================================================
// Type Aliases
// ============================================================================

/// Default listing client using the reqwest HTTP backend.
pub type DefaultHfClient = HfClient<ReqwestBackend>;

// ============================================================================
// Client
// ============================================================================

/// Client for the listing API.
///
/// This client is generic over an HTTP backend, allowing for easy testing.
/// Use `DefaultHfClient` for production code. The generic parameter `B` is
/// an implementation detail - external code should not instantiate this
/// directly but use `DefaultHfClient::new()`.
pub struct HfClient<B: HttpBackend> {
    pub(crate) backend: B,
    pub(crate) config: HfConfig,
}

impl DefaultHfClient {
    /// Create a new client with the given configuration.
    ///
    /// Fails when a base URL does not parse or the HTTP client cannot be
    /// built.
    pub fn new(config: &HfClientConfig) -> modelfetch_core::FetchResult<Self> {
        Self::try_new(config).map_err(crate::port::map_error)
    }

    fn try_new(config: &HfClientConfig) -> HfResult<Self> {
        let internal_config = HfConfig::from_public(config)?;
        let backend = ReqwestBackend::new(&internal_config)?;
        Ok(Self {
            backend,
            config: internal_config,
        })
    }
}

impl<B: HttpBackend> HfClient<B> {
    /// Create a new client with a custom backend.
    ///
    /// Use this for testing with a fake backend.
    #[cfg(test)]
    pub(crate) const fn with_backend(config: HfConfig, backend: B) -> Self {
        Self { backend, config }
    }
}

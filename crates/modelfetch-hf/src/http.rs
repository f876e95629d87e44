//! HTTP backend abstraction for the listing API.
//!
//! This module provides a trait-based HTTP backend that allows for
//! dependency injection and easy testing. The production implementation
//! uses reqwest with automatic retry logic for transient errors.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{HfError, HfResult};
use crate::models::HfConfig;

// ============================================================================
// HTTP Backend Trait
// ============================================================================

/// Trait for HTTP backends that can fetch JSON from URLs.
///
/// This is an implementation detail - external code should use the
/// `ListingResolverPort` trait.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// Fetch a URL and parse the body as JSON.
    ///
    /// Non-success statuses surface as `HfError::ApiRequestFailed`.
    async fn get_json(&self, url: &Url) -> HfResult<Value>;
}

// ============================================================================
// Reqwest Backend
// ============================================================================

/// Production HTTP backend using reqwest with retry logic.
///
/// Implements exponential backoff for transient server errors (5xx)
/// and network errors.
pub struct ReqwestBackend {
    client: reqwest::Client,
    max_retries: u8,
    retry_base_delay_ms: u64,
    auth_token: Option<String>,
}

impl ReqwestBackend {
    /// Create a new reqwest backend with the given configuration.
    pub fn new(config: &HfConfig) -> HfResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_base_delay_ms: config.retry_base_delay_ms,
            auth_token: config.token.clone(),
        })
    }

    /// Build a request with optional authentication.
    fn build_request(&self, url: &Url) -> reqwest::RequestBuilder {
        let mut request = self.client.get(url.as_str());
        if let Some(ref token) = self.auth_token {
            request = request.bearer_auth(token);
        }
        request
    }

    fn backoff(&self, attempt: u8) -> Duration {
        Duration::from_millis(
            self.retry_base_delay_ms
                .saturating_mul(2u64.saturating_pow(u32::from(attempt) - 1)),
        )
    }

    /// Fetch a URL with automatic retry for transient errors.
    async fn fetch_with_retry(&self, url: &Url) -> HfResult<reqwest::Response> {
        let mut attempt: u8 = 0;

        loop {
            if attempt > 0 {
                let delay = self.backoff(attempt);
                debug!(%url, attempt, ?delay, "Retrying listing request");
                tokio::time::sleep(delay).await;
            }

            match self.build_request(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }

                    // 5xx errors are retryable (server-side issues)
                    if status.is_server_error() && attempt < self.max_retries {
                        attempt += 1;
                        continue;
                    }

                    // 4xx errors or final attempt - fail immediately
                    return Err(HfError::ApiRequestFailed {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }
                Err(e) => {
                    // Network errors are retryable
                    if attempt < self.max_retries {
                        attempt += 1;
                        continue;
                    }
                    if e.is_timeout() {
                        return Err(HfError::Timeout {
                            url: url.to_string(),
                        });
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get_json(&self, url: &Url) -> HfResult<Value> {
        let response = self.fetch_with_retry(url).await?;
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                HfError::Timeout {
                    url: url.to_string(),
                }
            } else {
                e.into()
            }
        })?;
        Ok(serde_json::from_str(&body)?)
    }
}

// ============================================================================
// Fake Backend for Testing
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Canned response for the fake backend.
    #[derive(Clone)]
    pub struct CannedResponse {
        pub json: Value,
        pub status: u16,
    }

    impl CannedResponse {
        /// A 200 response with the given body.
        pub const fn json(json: Value) -> Self {
            Self { json, status: 200 }
        }

        /// An error status with no usable body.
        pub const fn status(status: u16) -> Self {
            Self {
                json: Value::Null,
                status,
            }
        }
    }

    /// A fake HTTP backend that returns canned responses.
    ///
    /// Patterns are matched as URL substrings in insertion order; the
    /// first match wins, so register more specific patterns first.
    pub struct FakeBackend {
        responses: Vec<(String, CannedResponse)>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl FakeBackend {
        /// Create a new fake backend.
        pub fn new() -> Self {
            Self {
                responses: Vec::new(),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Add a canned response for a URL pattern.
        pub fn with_response(mut self, url_contains: &str, response: CannedResponse) -> Self {
            self.responses.push((url_contains.to_string(), response));
            self
        }

        /// Shared log of every requested URL, in request order.
        pub fn request_log(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.requests)
        }

        fn find_response(&self, url: &str) -> Option<CannedResponse> {
            self.responses
                .iter()
                .find(|(pattern, _)| url.contains(pattern.as_str()))
                .map(|(_, response)| response.clone())
        }
    }

    impl Default for FakeBackend {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl HttpBackend for FakeBackend {
        async fn get_json(&self, url: &Url) -> HfResult<Value> {
            self.requests.lock().unwrap().push(url.to_string());

            let response =
                self.find_response(url.as_str())
                    .ok_or_else(|| HfError::ApiRequestFailed {
                        status: 404,
                        url: url.to_string(),
                    })?;

            if response.status >= 400 {
                return Err(HfError::ApiRequestFailed {
                    status: response.status,
                    url: url.to_string(),
                });
            }
            Ok(response.json)
        }
    }
}

//! Internal error types for listing operations.
//!
//! These errors are internal to `modelfetch-hf` and are mapped to
//! `FetchError` at the port boundary.

use thiserror::Error;

/// Result type alias for listing operations.
pub type HfResult<T> = Result<T, HfError>;

/// Errors related to listing API operations.
#[derive(Debug, Error)]
pub enum HfError {
    /// API request failed with an HTTP error status.
    #[error("HuggingFace API request failed with status {status}: {url}")]
    ApiRequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// API returned an invalid or unexpected response.
    #[error("Invalid response from HuggingFace API: {message}")]
    InvalidResponse {
        /// Description of what was invalid
        message: String,
    },

    /// The requested model or branch was not found.
    #[error("Model '{model_id}' (branch '{branch}') not found on HuggingFace")]
    ModelNotFound {
        /// The model ID that was not found
        model_id: String,
        /// The branch that was requested
        branch: String,
    },

    /// Listing needed more pages than allowed.
    #[error("Listing exceeded the limit of {max_pages} pages")]
    PageLimitExceeded {
        /// Configured page cap
        max_pages: u32,
    },

    /// Listing returned the same page twice.
    #[error("Listing pagination made no progress after '{last_path}'")]
    PaginationStalled {
        /// Last path of the repeated page
        last_path: String,
    },

    /// Request did not complete within the configured timeout.
    #[error("Request timed out: {url}")]
    Timeout {
        /// The URL that was requested
        url: String,
    },

    /// Network or HTTP client error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

//! Error types shared by every modelfetch crate.
//!
//! These errors are designed to be cloneable and serializable so a single
//! failure can be stored in a per-file result and reported later. For I/O
//! errors, we capture the kind and message as strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for modelfetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Error type for listing resolution and file downloads.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum FetchError {
    /// Caller-supplied input was rejected before any network call.
    #[error("Invalid input: {message}")]
    Validation {
        /// What was wrong with the input.
        message: String,
    },

    /// Model, branch or file does not exist on the remote service.
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found.
        message: String,
    },

    /// The listing response was malformed or pagination ran away.
    #[error("Unexpected listing response: {message}")]
    Parse {
        /// Description of the problem.
        message: String,
    },

    /// Transport failure, timeout or unexpected HTTP status.
    #[error("Network error: {message}")]
    Network {
        /// Detailed error message.
        message: String,
        /// HTTP status code if available.
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },

    /// Local filesystem failure.
    #[error("I/O error ({kind}): {message}")]
    Io {
        /// The kind of I/O error (e.g., "`NotFound`", "`PermissionDenied`").
        kind: String,
        /// Detailed error message.
        message: String,
    },

    /// Downloaded file does not match its recorded content hash.
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    IntegrityFailed {
        /// File that failed verification.
        path: String,
        /// Digest recorded by the listing.
        expected: String,
        /// Digest computed locally.
        actual: String,
    },

    /// Work was cancelled by the caller.
    #[error("Download cancelled")]
    Cancelled,
}

impl FetchError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a network error with HTTP status code.
    pub fn network_with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Network {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create an I/O error from kind and message strings.
    pub fn io(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::Io {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    /// Create an integrity check failed error.
    pub fn integrity_failed(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::IntegrityFailed {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Check if re-running the download can recover from this error.
    ///
    /// Network and I/O failures leave the partial file on disk, so the next
    /// run resumes it with a ranged request.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Io { .. } | Self::Cancelled
        )
    }

    /// Short machine-friendly label for the error category.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::NotFound { .. } => "not_found",
            Self::Parse { .. } => "parse",
            Self::Network { .. } => "network",
            Self::Io { .. } => "io",
            Self::IntegrityFailed { .. } => "integrity",
            Self::Cancelled => "cancelled",
        }
    }
}

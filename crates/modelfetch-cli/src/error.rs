//! CLI-specific error types and mappings.
//!
//! Maps library errors to exit codes and user-facing messages.

use modelfetch_core::FetchError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Argument validation error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Listing resolution or engine setup failed.
    #[error("{0}")]
    Fetch(FetchError),

    /// IO error (output folder, metadata file).
    #[error("IO error: {0}")]
    Io(String),

    /// External process error.
    #[error("Process error: {0}")]
    Process(String),

    /// Some files did not download or verify.
    #[error("{failed} of {total} files failed")]
    DownloadsFailed {
        /// Number of failed files.
        failed: usize,
        /// Number of planned files.
        total: usize,
    },
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Fetch(_) | Self::DownloadsFailed { .. } => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Process(_) => 71,  // EX_OSERR
        }
    }
}

impl From<FetchError> for CliError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Validation { message } => Self::Arguments(message),
            other => Self::Fetch(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

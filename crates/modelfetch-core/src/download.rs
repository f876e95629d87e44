//! Download domain types.
//!
//! Pure data types describing per-file outcomes and progress; the engine
//! that produces them lives in `modelfetch-download`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::FetchError;

/// Lifecycle state of a single download task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Scheduled, waiting for a worker.
    Pending,
    /// Issuing a fresh request for the full resource.
    Starting,
    /// Probing the remote size of a partially downloaded file.
    Resuming,
    /// Writing the response body to disk.
    Streaming,
    /// Finished successfully.
    Complete,
    /// Finished with an error.
    Failed,
}

impl TaskState {
    /// Whether the task has reached a final state.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Get the canonical string representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Starting => "starting",
            Self::Resuming => "resuming",
            Self::Streaming => "streaming",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }
}

/// Progress update emitted by a download worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Position of the file in the engine's input.
    pub index: usize,
    /// Destination path relative to the output directory.
    pub file: String,
    /// Current task state.
    pub state: TaskState,
    /// Bytes present in the destination file so far.
    pub downloaded: u64,
    /// Total expected size, when the server reported one.
    pub total: Option<u64>,
}

/// Successful outcome of one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// Bytes were transferred.
    Downloaded {
        /// Bytes written during this run.
        bytes_written: u64,
        /// Offset the transfer resumed from (0 for a fresh download).
        resumed_from: u64,
    },
    /// The local file already had the full size; nothing was transferred.
    AlreadyComplete {
        /// Size of the local file.
        size: u64,
    },
}

/// Final result for one requested URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadResult {
    /// Requested URL.
    pub url: String,
    /// Destination path (as planned, even when the download failed).
    pub path: PathBuf,
    /// Outcome or the per-file error.
    pub outcome: Result<DownloadOutcome, FetchError>,
}

impl DownloadResult {
    /// Whether the file is fully present on disk.
    pub const fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The per-file error, if any.
    pub fn error(&self) -> Option<&FetchError> {
        self.outcome.as_ref().err()
    }
}

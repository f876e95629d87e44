//! Per-file download task state.

use std::path::PathBuf;

use modelfetch_core::{ProgressEvent, TaskState};
use tokio::sync::mpsc::Sender;

/// State of one file while a worker owns it.
///
/// Every state change and byte-count change is mirrored to the progress
/// channel, when one is attached. The channel is bounded and never awaited:
/// events that find it full or closed are dropped.
#[derive(Debug)]
pub struct DownloadTask {
    pub(crate) index: usize,
    pub(crate) url: String,
    pub(crate) destination: PathBuf,
    /// Path shown in progress events, relative to the output directory.
    pub(crate) label: String,
    pub(crate) bytes_expected: Option<u64>,
    pub(crate) bytes_written: u64,
    pub(crate) state: TaskState,
    progress: Option<Sender<ProgressEvent>>,
}

impl DownloadTask {
    pub(crate) fn new(
        index: usize,
        url: String,
        destination: PathBuf,
        label: String,
        progress: Option<Sender<ProgressEvent>>,
    ) -> Self {
        Self {
            index,
            url,
            destination,
            label,
            bytes_expected: None,
            bytes_written: 0,
            state: TaskState::Pending,
            progress,
        }
    }

    pub(crate) fn transition(&mut self, state: TaskState) {
        self.state = state;
        self.emit();
    }

    /// Restart byte accounting at `offset` with a new expected total.
    pub(crate) fn reset_bytes(&mut self, offset: u64, expected: Option<u64>) {
        self.bytes_written = offset;
        self.bytes_expected = expected;
    }

    pub(crate) fn advance(&mut self, bytes: u64) {
        self.bytes_written += bytes;
        self.emit();
    }

    fn emit(&self) {
        // Reserve first so a full channel costs no allocation.
        let Some(Ok(permit)) = self.progress.as_ref().map(Sender::try_reserve) else {
            return;
        };
        permit.send(ProgressEvent {
            index: self.index,
            file: self.label.clone(),
            state: self.state,
            downloaded: self.bytes_written,
            total: self.bytes_expected,
        });
    }
}

//! Final per-file report.

use std::path::Path;

use indicatif::HumanBytes;
use modelfetch_core::{DownloadOutcome, DownloadResult};
use modelfetch_download::VerifyResult;

/// Counts over one run's results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Files transferred from scratch.
    pub downloaded: usize,
    /// Files continued from a partial local copy.
    pub resumed: usize,
    /// Files that were already complete.
    pub skipped: usize,
    /// Files that failed.
    pub failed: usize,
    /// Bytes written during this run.
    pub bytes: u64,
}

impl Summary {
    /// Tally a set of download results.
    pub fn from_results(results: &[DownloadResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            match &result.outcome {
                Ok(DownloadOutcome::Downloaded {
                    bytes_written,
                    resumed_from,
                }) => {
                    if *resumed_from > 0 {
                        summary.resumed += 1;
                    } else {
                        summary.downloaded += 1;
                    }
                    summary.bytes += bytes_written;
                }
                Ok(DownloadOutcome::AlreadyComplete { .. }) => summary.skipped += 1,
                Err(_) => summary.failed += 1,
            }
            summary
        })
    }

    /// One-line summary.
    pub fn line(&self) -> String {
        format!(
            "{} downloaded, {} resumed, {} already complete, {} failed ({} written)",
            self.downloaded,
            self.resumed,
            self.skipped,
            self.failed,
            HumanBytes(self.bytes)
        )
    }
}

/// Line describing one file's outcome, with its path relative to `folder`.
pub fn result_line(result: &DownloadResult, folder: &Path) -> String {
    let path = result.path.strip_prefix(folder).unwrap_or(&result.path);
    match &result.outcome {
        Ok(DownloadOutcome::Downloaded {
            bytes_written,
            resumed_from: 0,
        }) => format!("  ok      {} ({})", path.display(), HumanBytes(*bytes_written)),
        Ok(DownloadOutcome::Downloaded {
            bytes_written,
            resumed_from,
        }) => format!(
            "  resumed {} (+{} after {})",
            path.display(),
            HumanBytes(*bytes_written),
            HumanBytes(*resumed_from)
        ),
        Ok(DownloadOutcome::AlreadyComplete { .. }) => {
            format!("  skipped {} (already complete)", path.display())
        }
        Err(error) => format!("  FAILED  {} [{}]: {error}", result.url, error.category()),
    }
}

/// Line describing one checksum result.
pub fn verify_line(result: &VerifyResult) -> String {
    match &result.outcome {
        Ok(()) => format!("  verified {}", result.path),
        Err(error) => format!("  MISMATCH {}: {error}", result.path),
    }
}

/// Print the per-file lines and the summary to stdout.
pub fn print_report(results: &[DownloadResult], verified: &[VerifyResult], folder: &Path) {
    for result in results {
        println!("{}", result_line(result, folder));
    }
    if !verified.is_empty() {
        println!();
        println!("Checksums:");
        for result in verified {
            println!("{}", verify_line(result));
        }
    }
    println!();
    println!("{}", Summary::from_results(results).line());
}

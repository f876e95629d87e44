//! Checksum verification of downloaded files.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use modelfetch_core::plan::LFS_HASH_ALGORITHM;
use modelfetch_core::{ContentHash, DownloadPlan, FetchError, FetchResult};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::request::validate_relative_path;

/// Outcome of verifying one plan file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    /// Path relative to the output directory.
    pub path: String,
    /// `Ok` when the digest matched.
    pub outcome: FetchResult<()>,
}

/// Compute the lowercase hex sha256 of a file.
pub fn compute_sha256(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 1024 * 1024]; // 1MB chunks

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Compare a file against its recorded hash.
///
/// Hashing runs on the blocking pool.
pub async fn verify_file(path: &Path, expected: &ContentHash) -> FetchResult<()> {
    if expected.algorithm != LFS_HASH_ALGORITHM {
        return Err(FetchError::validation(format!(
            "unsupported hash algorithm '{}'",
            expected.algorithm
        )));
    }

    let owned: PathBuf = path.to_path_buf();
    let actual = tokio::task::spawn_blocking(move || compute_sha256(&owned))
        .await
        .map_err(|e| FetchError::io("Other", format!("hashing task failed: {e}")))?
        .map_err(|e| FetchError::from_io_error(&e))?;

    if actual.eq_ignore_ascii_case(&expected.digest) {
        debug!(path = %path.display(), "Checksum verified");
        Ok(())
    } else {
        Err(FetchError::integrity_failed(
            path.display().to_string(),
            expected.digest.clone(),
            actual,
        ))
    }
}

/// Verify every plan file that has a recorded hash, in plan order.
///
/// Files without a hash are skipped.
pub async fn verify_plan(plan: &DownloadPlan, dest_dir: &Path) -> Vec<VerifyResult> {
    let mut results = Vec::new();

    for entry in &plan.files {
        let Some(expected) = &entry.content_hash else {
            continue;
        };

        let outcome = match validate_relative_path(&entry.path) {
            Ok(relative) => verify_file(&dest_dir.join(relative), expected).await,
            Err(e) => Err(e),
        };
        if let Err(error) = &outcome {
            warn!(path = %entry.path, %error, "Checksum verification failed");
        }

        results.push(VerifyResult {
            path: entry.path.clone(),
            outcome,
        });
    }

    results
}

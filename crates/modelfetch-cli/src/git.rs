//! `git clone` fallback for fetching a whole repository.

use std::ffi::OsString;
use std::path::Path;

use modelfetch_core::FetchOptions;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::CliError;

/// Arguments passed to `git`.
pub fn clone_args(endpoint: &str, options: &FetchOptions, folder: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["clone".into()];
    if !options.branch.is_main() {
        args.push("--branch".into());
        args.push(options.branch.as_str().into());
    }
    args.push(format!("{}/{}", endpoint.trim_end_matches('/'), options.model).into());
    args.push(folder.as_os_str().to_owned());
    args
}

/// Clone the repository into `folder` with the system `git`.
pub async fn clone_repository(
    endpoint: &str,
    options: &FetchOptions,
    folder: &Path,
) -> Result<(), CliError> {
    let args = clone_args(endpoint, options, folder);
    debug!(?args, "Running git");
    info!(model = %options.model, folder = %folder.display(), "Cloning repository");

    let status = Command::new("git")
        .args(&args)
        .status()
        .await
        .map_err(|e| CliError::Process(format!("failed to run git: {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(CliError::Process(format!("git clone exited with {status}")))
    }
}

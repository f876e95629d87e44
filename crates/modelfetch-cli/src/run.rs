//! One invocation, start to finish.
//!
//! Resolve the listing, prepare the output folder, run the engine and
//! report. Per-file failures never abort the run; they are counted into the
//! final `CliError::DownloadsFailed`.

use std::collections::BTreeSet;

use indicatif::HumanBytes;
use modelfetch_core::{DownloadPlan, DownloadResult, FetchOptions, ListingResolverPort};
use modelfetch_download::{
    DEFAULT_PROGRESS_CAPACITY, DownloadEngine, EngineConfig, VerifyResult, verify_plan,
};
use modelfetch_hf::{DefaultHfClient, HfClientConfig};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::CliError;
use crate::output::{output_folder, write_metadata};
use crate::parser::Cli;
use crate::{git, progress, report};

/// Run the command described by `cli`.
pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let options = cli.to_options()?;
    let endpoint = cli.endpoint();

    if cli.git_clone {
        let folder = output_folder(&options, false);
        println!("Cloning the model to {}", folder.display());
        git::clone_repository(endpoint, &options, &folder).await?;
        write_metadata(&folder, endpoint, &options).await?;
        return Ok(());
    }

    let plan = resolve(cli, &options).await?;
    let folder = output_folder(&options, plan.is_adapter);
    println!(
        "Downloading {} file(s) ({}) to {}",
        plan.files.len(),
        HumanBytes(plan.total_size()),
        folder.display()
    );
    write_metadata(&folder, endpoint, &options).await?;

    if plan.is_empty() {
        println!("Nothing to download");
        return Ok(());
    }

    let engine_config = EngineConfig::new()
        .with_timeout(options.timeout)
        .with_connect_timeout(options.timeout)
        .with_optional_token(options.token.clone());
    let (tx, rx) = mpsc::channel(DEFAULT_PROGRESS_CAPACITY);
    let cancel = CancellationToken::new();
    let engine = DownloadEngine::new(engine_config)?
        .with_progress(tx)
        .with_cancellation(cancel.clone());

    let printer = progress::spawn_printer(rx);
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping downloads");
            cancel.cancel();
        }
    });

    let results = engine
        .download_plan(&plan, &folder, options.threads, options.clean)
        .await;
    // Dropping the engine closes the progress channel.
    drop(engine);
    interrupt.abort();
    if let Err(e) = printer.await {
        warn!(error = %e, "Progress printer stopped unexpectedly");
    }

    let verified = if options.check {
        verify_plan(&plan, &folder).await
    } else {
        Vec::new()
    };
    report::print_report(&results, &verified, &folder);

    let failed = failed_files(&plan, &results, &verified);
    if failed > 0 {
        return Err(CliError::DownloadsFailed {
            failed,
            total: plan.files.len(),
        });
    }
    Ok(())
}

async fn resolve(cli: &Cli, options: &FetchOptions) -> Result<DownloadPlan, CliError> {
    let config = HfClientConfig::new()
        .with_api_base(cli.api_base())
        .with_download_base(cli.endpoint())
        .with_timeout(options.timeout)
        .with_max_pages(options.max_pages)
        .with_optional_token(options.token.clone());
    let client = DefaultHfClient::new(&config)?;

    let plan = client
        .resolve(&options.model, &options.branch, options.text_only)
        .await?;
    info!(model = %options.model, files = plan.files.len(), "Resolved listing");
    Ok(plan)
}

/// Number of distinct plan files that failed to download or verify.
fn failed_files(plan: &DownloadPlan, results: &[DownloadResult], verified: &[VerifyResult]) -> usize {
    let downloads = plan
        .files
        .iter()
        .zip(results)
        .filter(|(_, result)| !result.is_success())
        .map(|(entry, _)| entry.path.as_str());
    let checks = verified
        .iter()
        .filter(|result| result.outcome.is_err())
        .map(|result| result.path.as_str());

    downloads.chain(checks).collect::<BTreeSet<_>>().len()
}

//! Download worker pipeline.
//!
//! Runs one `DownloadTask` to completion: decide between a fresh download,
//! a resume and a no-op, then stream the body to disk.
//!
//! - The worker owns the task and its destination file exclusively.
//! - Cancellation is handled via `tokio::select!` around every await on the
//!   network; the partial file stays on disk.
//! - Every network await is bounded by the configured timeout.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use modelfetch_core::{DownloadOutcome, FetchError, FetchResult, TaskState};
use reqwest::header::{CONTENT_LENGTH, RANGE};
use reqwest::{RequestBuilder, Response, StatusCode};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::task::DownloadTask;

/// Dependencies shared by every worker of one engine run.
#[derive(Clone)]
pub struct WorkerDeps {
    pub client: reqwest::Client,
    pub timeout: Duration,
    pub chunk_size: usize,
    pub cancel: CancellationToken,
}

/// Run a task, leaving it in `Complete` or `Failed`.
pub async fn run_task(
    task: &mut DownloadTask,
    deps: &WorkerDeps,
    clean: bool,
) -> FetchResult<DownloadOutcome> {
    let result = execute(task, deps, clean).await;
    task.transition(if result.is_ok() {
        TaskState::Complete
    } else {
        TaskState::Failed
    });
    result
}

async fn execute(
    task: &mut DownloadTask,
    deps: &WorkerDeps,
    clean: bool,
) -> FetchResult<DownloadOutcome> {
    if let Some(parent) = task.destination.parent() {
        fs::create_dir_all(parent).await.map_err(|e| io_error(&e))?;
    }

    let local_size = if clean {
        None
    } else {
        local_file_size(&task.destination).await
    };
    let Some(local_size) = local_size else {
        return fresh_download(task, deps).await;
    };

    task.transition(TaskState::Resuming);
    let Some(total) = remote_size(&task.url, deps).await? else {
        debug!(url = %task.url, "Server reported no size, restarting download");
        return fresh_download(task, deps).await;
    };
    task.reset_bytes(local_size, Some(total));

    if local_size >= total {
        debug!(url = %task.url, local_size, total, "Already complete");
        return Ok(DownloadOutcome::AlreadyComplete { size: local_size });
    }

    ranged_download(task, deps, local_size, total).await
}

async fn local_file_size(path: &Path) -> Option<u64> {
    fs::metadata(path)
        .await
        .ok()
        .filter(std::fs::Metadata::is_file)
        .map(|meta| meta.len())
}

/// Read the remote size from a `HEAD` response, without any body transfer.
///
/// `Response::content_length` reports the (empty) body of a `HEAD`, so the
/// header is read directly. Servers that refuse `HEAD` read as unknown size.
async fn remote_size(url: &str, deps: &WorkerDeps) -> FetchResult<Option<u64>> {
    let response = send(deps, deps.client.head(url), url).await?;
    if matches!(
        response.status(),
        StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED
    ) {
        return Ok(None);
    }
    check_status(&response, url)?;
    Ok(response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        // An empty-bodied HEAD may carry `Content-Length: 0` without meaning it.
        .filter(|&len| len > 0))
}

async fn fresh_download(task: &mut DownloadTask, deps: &WorkerDeps) -> FetchResult<DownloadOutcome> {
    task.transition(TaskState::Starting);
    let response = send(deps, deps.client.get(&task.url), &task.url).await?;
    check_status(&response, &task.url)?;

    restart(task, deps, response).await
}

async fn ranged_download(
    task: &mut DownloadTask,
    deps: &WorkerDeps,
    offset: u64,
    total: u64,
) -> FetchResult<DownloadOutcome> {
    let request = deps
        .client
        .get(&task.url)
        .header(RANGE, format!("bytes={offset}-"));
    let response = send(deps, request, &task.url).await?;

    match response.status() {
        StatusCode::PARTIAL_CONTENT => {
            let mut file = OpenOptions::new()
                .append(true)
                .open(&task.destination)
                .await
                .map_err(|e| io_error(&e))?;
            task.reset_bytes(offset, Some(total));
            let bytes_written = stream_body(task, deps, response, &mut file).await?;
            Ok(DownloadOutcome::Downloaded {
                bytes_written,
                resumed_from: offset,
            })
        }
        StatusCode::RANGE_NOT_SATISFIABLE => {
            // HEAD said bytes remain; the local file no longer matches.
            debug!(url = %task.url, offset, total, "Range rejected, downloading from scratch");
            fresh_download(task, deps).await
        }
        StatusCode::OK => {
            debug!(url = %task.url, "Server ignored range request, rewriting file");
            restart(task, deps, response).await
        }
        _ => {
            check_status(&response, &task.url)?;
            Err(FetchError::network_with_status(
                format!("unexpected response to range request: {}", task.url),
                response.status().as_u16(),
            ))
        }
    }
}

/// Write a full-body response over the destination.
async fn restart(
    task: &mut DownloadTask,
    deps: &WorkerDeps,
    response: Response,
) -> FetchResult<DownloadOutcome> {
    let mut file = File::create(&task.destination)
        .await
        .map_err(|e| io_error(&e))?;
    task.reset_bytes(0, response.content_length());
    let bytes_written = stream_body(task, deps, response, &mut file).await?;
    Ok(DownloadOutcome::Downloaded {
        bytes_written,
        resumed_from: 0,
    })
}

/// Stream the body to `file`, returning the bytes written. The file is
/// flushed even when streaming fails, so a partial file is resumable.
async fn stream_body(
    task: &mut DownloadTask,
    deps: &WorkerDeps,
    response: Response,
    file: &mut File,
) -> FetchResult<u64> {
    task.transition(TaskState::Streaming);
    let result = pump(task, deps, response, file).await;
    let flushed = file.flush().await.map_err(|e| io_error(&e));
    let written = result?;
    flushed?;
    Ok(written)
}

async fn pump(
    task: &mut DownloadTask,
    deps: &WorkerDeps,
    response: Response,
    file: &mut File,
) -> FetchResult<u64> {
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;

            () = deps.cancel.cancelled() => return Err(FetchError::Cancelled),

            next = tokio::time::timeout(deps.timeout, stream.next()) => next,
        };

        let bytes = match next {
            Err(_) => return Err(timed_out(deps.timeout, &task.url)),
            Ok(None) => break,
            Ok(Some(Err(e))) => return Err(FetchError::network(e.to_string())),
            Ok(Some(Ok(bytes))) => bytes,
        };

        for chunk in bytes.chunks(deps.chunk_size) {
            file.write_all(chunk).await.map_err(|e| io_error(&e))?;
            written += chunk.len() as u64;
            task.advance(chunk.len() as u64);
        }
    }

    Ok(written)
}

/// Issue a request, racing it against cancellation and the timeout.
async fn send(deps: &WorkerDeps, request: RequestBuilder, url: &str) -> FetchResult<Response> {
    tokio::select! {
        biased;

        () = deps.cancel.cancelled() => Err(FetchError::Cancelled),

        result = tokio::time::timeout(deps.timeout, request.send()) => match result {
            Err(_) => Err(timed_out(deps.timeout, url)),
            Ok(Err(e)) => Err(FetchError::network(e.to_string())),
            Ok(Ok(response)) => Ok(response),
        },
    }
}

fn check_status(response: &Response, url: &str) -> FetchResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::not_found(url.to_string()));
    }
    Err(FetchError::network_with_status(
        format!("request failed with status {status}: {url}"),
        status.as_u16(),
    ))
}

fn timed_out(timeout: Duration, url: &str) -> FetchError {
    FetchError::network(format!("no response within {}s: {url}", timeout.as_secs_f32()))
}

fn io_error(err: &std::io::Error) -> FetchError {
    FetchError::from_io_error(err)
}

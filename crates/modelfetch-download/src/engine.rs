//! Concurrent download engine.
//!
//! A fixed pool of workers pulls tasks from a shared FIFO queue. Each
//! worker owns one file at a time; results flow back over an mpsc channel
//! and are returned in input order.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use modelfetch_core::{
    DownloadPlan, DownloadResult, FetchError, FetchResult, ProgressEvent, TaskState,
};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::request::DownloadRequest;
use crate::task::DownloadTask;
use crate::worker::{WorkerDeps, run_task};

/// Downloads files concurrently with resume support.
///
/// # Example
///
/// ```ignore
/// use modelfetch_download::{DownloadEngine, EngineConfig};
///
/// let engine = DownloadEngine::new(EngineConfig::default())?;
/// let results = engine
///     .download_all(&urls, Path::new("models/org_model"), 4, false)
///     .await;
/// ```
pub struct DownloadEngine {
    client: reqwest::Client,
    config: EngineConfig,
    progress: Option<mpsc::Sender<ProgressEvent>>,
    cancel: CancellationToken,
}

impl DownloadEngine {
    /// Build an engine and its HTTP client.
    pub fn new(config: EngineConfig) -> FetchResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| FetchError::validation("token contains characters not allowed in a header"))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            progress: None,
            cancel: CancellationToken::new(),
        })
    }

    /// Stream progress events to `tx`.
    ///
    /// Events never wait for room: while the channel is full they are
    /// dropped. See [`DEFAULT_PROGRESS_CAPACITY`](crate::DEFAULT_PROGRESS_CAPACITY).
    #[must_use]
    pub fn with_progress(mut self, tx: mpsc::Sender<ProgressEvent>) -> Self {
        self.progress = Some(tx);
        self
    }

    /// Use an externally owned cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops the engine when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Download every URL into `dest_dir`, naming each file after the
    /// URL's final path segment.
    ///
    /// Returns one result per URL, in input order.
    pub async fn download_all(
        &self,
        urls: &[String],
        dest_dir: &Path,
        concurrency: usize,
        clean: bool,
    ) -> Vec<DownloadResult> {
        let jobs = urls
            .iter()
            .map(|url| (url.clone(), DownloadRequest::from_url(url)))
            .collect();
        self.run(jobs, dest_dir, concurrency, clean).await
    }

    /// Download the files of a plan, keeping their relative paths.
    ///
    /// Returns one result per plan file, in plan order.
    pub async fn download_plan(
        &self,
        plan: &DownloadPlan,
        dest_dir: &Path,
        concurrency: usize,
        clean: bool,
    ) -> Vec<DownloadResult> {
        let jobs = plan
            .files
            .iter()
            .map(|entry| (entry.url.clone(), DownloadRequest::from_entry(entry)))
            .collect();
        self.run(jobs, dest_dir, concurrency, clean).await
    }

    async fn run(
        &self,
        jobs: Vec<(String, FetchResult<DownloadRequest>)>,
        dest_dir: &Path,
        concurrency: usize,
        clean: bool,
    ) -> Vec<DownloadResult> {
        let mut results: Vec<Option<DownloadResult>> = vec![None; jobs.len()];
        let mut planned: Vec<(String, PathBuf)> = Vec::with_capacity(jobs.len());
        let mut queue = VecDeque::new();

        for (index, (url, request)) in jobs.into_iter().enumerate() {
            match request {
                Ok(request) => {
                    let destination = request.destination(dest_dir);
                    planned.push((url.clone(), destination.clone()));
                    let mut task = DownloadTask::new(
                        index,
                        url,
                        destination,
                        request.relative_path().to_string_lossy().into_owned(),
                        self.progress.clone(),
                    );
                    task.transition(TaskState::Pending);
                    queue.push_back(task);
                }
                Err(error) => {
                    warn!(%url, %error, "Rejected download");
                    planned.push((url.clone(), dest_dir.to_path_buf()));
                    results[index] = Some(DownloadResult {
                        url,
                        path: dest_dir.to_path_buf(),
                        outcome: Err(error),
                    });
                }
            }
        }

        let workers = concurrency.max(1).min(queue.len());
        debug!(files = queue.len(), workers, "Starting download workers");

        let queue = Arc::new(Mutex::new(queue));
        let (tx, mut rx) = mpsc::channel(planned.len().max(1));
        let deps = WorkerDeps {
            client: self.client.clone(),
            timeout: self.config.timeout,
            chunk_size: self.config.chunk_size,
            cancel: self.cancel.clone(),
        };

        let mut set = JoinSet::new();
        for _ in 0..workers {
            let queue = Arc::clone(&queue);
            let tx = tx.clone();
            let deps = deps.clone();
            set.spawn(async move {
                loop {
                    if deps.cancel.is_cancelled() {
                        break;
                    }
                    let Some(mut task) = queue.lock().await.pop_front() else {
                        break;
                    };

                    let outcome = run_task(&mut task, &deps, clean).await;
                    match &outcome {
                        Ok(outcome) => debug!(url = %task.url, ?outcome, "Download finished"),
                        Err(error) => warn!(url = %task.url, %error, "Download failed"),
                    }

                    let index = task.index;
                    let result = DownloadResult {
                        url: task.url,
                        path: task.destination,
                        outcome,
                    };
                    if tx.send((index, result)).await.is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        while let Some((index, result)) = rx.recv().await {
            results[index] = Some(result);
        }
        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Download worker stopped unexpectedly");
            }
        }

        // Still queued means never started.
        for task in queue.lock().await.drain(..) {
            results[task.index] = Some(DownloadResult {
                url: task.url,
                path: task.destination,
                outcome: Err(FetchError::Cancelled),
            });
        }

        let results: Vec<DownloadResult> = results
            .into_iter()
            .zip(planned)
            .map(|(result, (url, path))| {
                result.unwrap_or_else(|| DownloadResult {
                    url,
                    path,
                    outcome: Err(FetchError::io("Other", "download worker stopped unexpectedly")),
                })
            })
            .collect();

        let failed = results.iter().filter(|r| !r.is_success()).count();
        info!(
            files = results.len(),
            succeeded = results.len() - failed,
            failed,
            "Downloads finished"
        );
        results
    }
}

//! Destination planning for downloads.
//!
//! A `DownloadRequest` pairs a URL with a validated path relative to the
//! output directory. Validation happens here, before any network call.

use std::path::{Component, Path, PathBuf};

use modelfetch_core::{FetchError, FetchResult, FileEntry};
use reqwest::Url;

/// One file to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    url: String,
    relative_path: PathBuf,
}

impl DownloadRequest {
    /// Plan a download named after the URL's final path segment.
    pub fn from_url(url: &str) -> FetchResult<Self> {
        let parsed =
            Url::parse(url).map_err(|e| FetchError::validation(format!("invalid URL '{url}': {e}")))?;
        let file_name = parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();
        if file_name.is_empty() {
            return Err(FetchError::validation(format!(
                "URL '{url}' has no file name"
            )));
        }

        Ok(Self {
            url: url.to_string(),
            relative_path: validate_relative_path(file_name)?,
        })
    }

    /// Plan a download that keeps the entry's repository-relative path.
    pub fn from_entry(entry: &FileEntry) -> FetchResult<Self> {
        Ok(Self {
            url: entry.url.clone(),
            relative_path: validate_relative_path(&entry.path)?,
        })
    }

    /// The URL to fetch.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path relative to the output directory.
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Absolute destination under `dest_dir`.
    pub fn destination(&self, dest_dir: &Path) -> PathBuf {
        dest_dir.join(&self.relative_path)
    }
}

/// Check that `path` stays inside the output directory.
///
/// Rejects empty paths, absolute paths, `.`/`..` segments, empty segments
/// and backslashes.
pub fn validate_relative_path(path: &str) -> FetchResult<PathBuf> {
    let reject = |reason: &str| FetchError::validation(format!("unsafe path '{path}': {reason}"));

    if path.is_empty() {
        return Err(reject("empty"));
    }
    if path.starts_with('/') || Path::new(path).is_absolute() {
        return Err(reject("absolute"));
    }
    if path.contains('\\') {
        return Err(reject("backslash separator"));
    }

    let mut relative = PathBuf::new();
    for segment in path.split('/') {
        match segment {
            "" => return Err(reject("empty segment")),
            "." | ".." => return Err(reject("relative segment")),
            _ => relative.push(segment),
        }
    }

    // Catches platform prefixes such as `C:` that survive the checks above.
    if !relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(reject("not a plain relative path"));
    }
    Ok(relative)
}

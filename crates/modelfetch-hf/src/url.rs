//! URL construction helpers for the listing and file endpoints.
//!
//! Pure functions; every URL the client issues is built here.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use modelfetch_core::{Branch, RepoRef};
use url::Url;

use crate::models::HfConfig;

/// Page size the listing API encodes into its cursor.
const CURSOR_PAGE_SIZE: u32 = 50;

/// Append path segments to a base URL, percent-encoding each one.
fn push_segments<'a>(url: &mut Url, segments: impl IntoIterator<Item = &'a str>) {
    // Bases are checked in `HfConfig::from_public`, so this never fails.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
}

/// Build the cursor that asks for the page after `last_path`.
///
/// `base64(base64('{"file_name":"<last_path>"}') + ":50")`. The value is
/// returned unescaped; `build_tree_url` percent-encodes it.
pub fn encode_cursor(last_path: &str) -> String {
    let marker = serde_json::json!({ "file_name": last_path }).to_string();
    let inner = format!("{}:{CURSOR_PAGE_SIZE}", STANDARD.encode(marker));
    STANDARD.encode(inner)
}

/// Build the URL for one page of `GET /{model}/tree/{branch}?recursive=true`.
///
/// Without `recursive` the API lists only the top level, and files inside
/// directories would never appear.
pub fn build_tree_url(
    config: &HfConfig,
    repo: &RepoRef,
    branch: &Branch,
    cursor: Option<&str>,
) -> Url {
    let mut url = config.api_base.clone();
    push_segments(&mut url, [repo.owner(), repo.name(), "tree", branch.as_str()]);
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("recursive", "true");
        if let Some(cursor) = cursor {
            query.append_pair("cursor", cursor);
        }
    }
    url
}

/// Build the download URL of a file: `{download_base}/{model}/resolve/{branch}/{path}`.
pub fn build_download_url(config: &HfConfig, repo: &RepoRef, branch: &Branch, path: &str) -> Url {
    let mut url = config.download_base.clone();
    push_segments(
        &mut url,
        [repo.owner(), repo.name(), "resolve", branch.as_str()],
    );
    push_segments(&mut url, path.split('/'));
    url
}

//! Paginated tree listing and plan resolution.

use modelfetch_core::{Branch, DownloadPlan, PlanBuilder, RepoRef};
use tracing::{debug, info};

use super::HfClient;
use crate::error::{HfError, HfResult};
use crate::http::HttpBackend;
use crate::models::TreeEntry;
use crate::parsing::{is_directory, parse_tree_entries};
use crate::url::{build_download_url, build_tree_url, encode_cursor};

impl<B: HttpBackend> HfClient<B> {
    /// Fetch every entry of the repository tree, following the cursor
    /// until a page comes back empty.
    ///
    /// More than `max_pages` non-empty pages, or a page ending on the same
    /// path as the one before it, aborts the listing.
    pub(crate) async fn list_tree(
        &self,
        repo: &RepoRef,
        branch: &Branch,
    ) -> HfResult<Vec<TreeEntry>> {
        let mut entries = Vec::new();
        let mut cursor: Option<String> = None;
        let mut previous_last: Option<String> = None;
        let mut pages: u32 = 0;

        loop {
            let url = build_tree_url(&self.config, repo, branch, cursor.as_deref());
            debug!(%url, page = pages + 1, "Fetching listing page");

            let body = self
                .backend
                .get_json(&url)
                .await
                .map_err(|e| not_found_as_model(e, repo, branch))?;
            let page = parse_tree_entries(body)?;

            let Some(last) = page.last() else {
                break;
            };

            pages += 1;
            if pages > self.config.max_pages {
                return Err(HfError::PageLimitExceeded {
                    max_pages: self.config.max_pages,
                });
            }
            if previous_last.as_deref() == Some(last.path.as_str()) {
                return Err(HfError::PaginationStalled {
                    last_path: last.path.clone(),
                });
            }

            cursor = Some(encode_cursor(&last.path));
            previous_last = Some(last.path.clone());
            entries.extend(page);
        }

        debug!(model = %repo, pages, entries = entries.len(), "Listing complete");
        Ok(entries)
    }

    /// Resolve the repository listing into a download plan.
    pub(crate) async fn resolve_plan(
        &self,
        repo: &RepoRef,
        branch: &Branch,
        text_only: bool,
    ) -> HfResult<DownloadPlan> {
        let entries = self.list_tree(repo, branch).await?;

        let mut builder = PlanBuilder::new(text_only);
        builder.extend(
            entries
                .into_iter()
                .filter(|entry| !is_directory(entry))
                .map(TreeEntry::into_listing_entry),
        );
        let plan = builder
            .finish(|path| build_download_url(&self.config, repo, branch, path).to_string());

        info!(
            model = %repo,
            branch = %branch,
            files = plan.files.len(),
            hashes = plan.hashes.len(),
            is_adapter = plan.is_adapter,
            "Resolved download plan"
        );
        Ok(plan)
    }
}

/// A missing or private repository answers 404 or 401.
fn not_found_as_model(err: HfError, repo: &RepoRef, branch: &Branch) -> HfError {
    match err {
        HfError::ApiRequestFailed {
            status: 401 | 404, ..
        } => HfError::ModelNotFound {
            model_id: repo.id(),
            branch: branch.to_string(),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_config;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use crate::models::HfConfig;
    use modelfetch_core::{ContentHash, FileFormat, HashRecord};
    use serde_json::json;

    fn repo() -> RepoRef {
        RepoRef::parse("org/model").unwrap()
    }

    fn file(path: &str) -> serde_json::Value {
        json!({"type": "file", "path": path, "size": 10})
    }

    fn lfs_file(path: &str, oid: &str) -> serde_json::Value {
        json!({"type": "file", "path": path, "size": 135,
               "lfs": {"oid": oid, "size": 1_000, "pointerSize": 135}})
    }

    fn client(backend: FakeBackend) -> HfClient<FakeBackend> {
        HfClient::with_backend(test_config(), backend)
    }

    #[tokio::test]
    async fn test_resolve_single_page_listing() {
        let backend = FakeBackend::new()
            .with_response("cursor=", CannedResponse::json(json!([])))
            .with_response(
                "org/model/tree/main",
                CannedResponse::json(json!([
                    lfs_file("model.safetensors", "abc"),
                    file("pytorch_model.bin"),
                    file("tokenizer.json"),
                    file("README.md")
                ])),
            );

        let plan = client(backend)
            .resolve_plan(&repo(), &Branch::main(), false)
            .await
            .unwrap();

        let paths: Vec<_> = plan.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["model.safetensors", "tokenizer.json", "README.md"]);
        assert_eq!(
            plan.hashes,
            vec![HashRecord {
                path: "model.safetensors".to_string(),
                hash: ContentHash::sha256("abc"),
            }]
        );
        assert!(!plan.is_adapter);
        assert_eq!(
            plan.files[0].url,
            "https://huggingface.co/org/model/resolve/main/model.safetensors"
        );
        assert_eq!(plan.files[0].format, FileFormat::Safetensors);
    }

    #[tokio::test]
    async fn test_resolve_follows_cursor_pages() {
        let second_cursor = encode_cursor("b.json");
        let first_cursor = encode_cursor("a.txt");
        let backend = FakeBackend::new()
            .with_response(
                second_cursor.trim_end_matches('='),
                CannedResponse::json(json!([])),
            )
            .with_response(
                "ZXlKbWFXeGxYMjVoYldVaU9pSmhMblI0ZENKOTo1MA%3D%3D",
                CannedResponse::json(json!([file("b.json")])),
            )
            .with_response("tree/main", CannedResponse::json(json!([file("a.txt")])));
        let log = backend.request_log();
        assert_eq!(first_cursor, "ZXlKbWFXeGxYMjVoYldVaU9pSmhMblI0ZENKOTo1MA==");

        let plan = client(backend)
            .resolve_plan(&repo(), &Branch::main(), true)
            .await
            .unwrap();

        let paths: Vec<_> = plan.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["a.txt", "b.json"]);
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_first_page_yields_empty_plan() {
        let backend =
            FakeBackend::new().with_response("tree/main", CannedResponse::json(json!([])));

        let plan = client(backend)
            .resolve_plan(&repo(), &Branch::main(), false)
            .await
            .unwrap();
        assert!(plan.is_empty());
        assert!(plan.hashes.is_empty());
    }

    #[tokio::test]
    async fn test_directories_are_skipped() {
        let backend = FakeBackend::new()
            .with_response("cursor=", CannedResponse::json(json!([])))
            .with_response(
                "tree/main",
                CannedResponse::json(json!([
                    {"type": "directory", "path": "notes.md", "size": 0},
                    file("config.json")
                ])),
            );

        let plan = client(backend)
            .resolve_plan(&repo(), &Branch::main(), false)
            .await
            .unwrap();
        assert_eq!(plan.files.len(), 1);
        assert_eq!(plan.files[0].path, "config.json");
    }

    #[tokio::test]
    async fn test_page_limit_is_enforced() {
        let config = HfConfig {
            max_pages: 1,
            ..test_config()
        };
        let backend = FakeBackend::new()
            .with_response("cursor=", CannedResponse::json(json!([file("b.txt")])))
            .with_response("tree/main", CannedResponse::json(json!([file("a.txt")])));

        let err = HfClient::with_backend(config, backend)
            .list_tree(&repo(), &Branch::main())
            .await
            .unwrap_err();
        assert!(matches!(err, HfError::PageLimitExceeded { max_pages: 1 }));
    }

    #[tokio::test]
    async fn test_repeated_page_is_rejected() {
        // Every request, cursor or not, returns the same page.
        let backend =
            FakeBackend::new().with_response("tree/main", CannedResponse::json(json!([file("a.txt")])));
        let log = backend.request_log();

        let err = client(backend)
            .list_tree(&repo(), &Branch::main())
            .await
            .unwrap_err();
        assert!(matches!(err, HfError::PaginationStalled { .. }));
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_model_maps_to_not_found() {
        for status in [401, 404] {
            let backend =
                FakeBackend::new().with_response("tree/main", CannedResponse::status(status));

            let err = client(backend)
                .resolve_plan(&repo(), &Branch::main(), false)
                .await
                .unwrap_err();
            assert!(
                matches!(err, HfError::ModelNotFound { ref model_id, .. } if model_id == "org/model")
            );
        }
    }

    #[tokio::test]
    async fn test_server_error_stays_api_error() {
        let backend = FakeBackend::new().with_response("tree/main", CannedResponse::status(500));

        let err = client(backend)
            .resolve_plan(&repo(), &Branch::main(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, HfError::ApiRequestFailed { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_malformed_page_aborts_resolution() {
        let backend = FakeBackend::new()
            .with_response("tree/main", CannedResponse::json(json!({"error": "nope"})));

        let err = client(backend)
            .resolve_plan(&repo(), &Branch::main(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, HfError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_adapter_listing_sets_flag() {
        let backend = FakeBackend::new()
            .with_response("cursor=", CannedResponse::json(json!([])))
            .with_response(
                "tree/main",
                CannedResponse::json(json!([
                    file("adapter_config.json"),
                    lfs_file("adapter_model.bin", "def")
                ])),
            );

        let plan = client(backend)
            .resolve_plan(&repo(), &Branch::main(), false)
            .await
            .unwrap();
        assert!(plan.is_adapter);
        assert_eq!(plan.files.len(), 2);
    }
}

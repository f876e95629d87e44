//! Port trait implementation for `HfClient`.
//!
//! This module implements the core-owned `ListingResolverPort` trait for
//! `HfClient`, converting internal errors into `FetchError`.

use async_trait::async_trait;
use modelfetch_core::{Branch, DownloadPlan, FetchError, FetchResult, ListingResolverPort, RepoRef};

use crate::client::HfClient;
use crate::error::HfError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `HfError` to core `FetchError`.
pub(crate) fn map_error(err: HfError) -> FetchError {
    match err {
        HfError::ApiRequestFailed { status, url } => match status {
            401 | 404 => FetchError::not_found(url),
            _ => FetchError::network_with_status(
                format!("listing request failed with status {status}: {url}"),
                status,
            ),
        },
        HfError::ModelNotFound { model_id, branch } => {
            FetchError::not_found(format!("model '{model_id}' at branch '{branch}'"))
        }
        HfError::InvalidResponse { message } => FetchError::parse(message),
        e @ (HfError::PageLimitExceeded { .. } | HfError::PaginationStalled { .. }) => {
            FetchError::parse(e.to_string())
        }
        HfError::JsonParse(e) => FetchError::parse(e.to_string()),
        e @ HfError::Timeout { .. } => FetchError::network(e.to_string()),
        HfError::Network(e) => match e.status() {
            Some(status) => FetchError::network_with_status(e.to_string(), status.as_u16()),
            None => FetchError::network(e.to_string()),
        },
        HfError::InvalidUrl(e) => FetchError::validation(format!("invalid base URL: {e}")),
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend> ListingResolverPort for HfClient<B> {
    async fn resolve(
        &self,
        repo: &RepoRef,
        branch: &Branch,
        text_only: bool,
    ) -> FetchResult<DownloadPlan> {
        self.resolve_plan(repo, branch, text_only)
            .await
            .map_err(map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_config;
    use crate::http::testing::{CannedResponse, FakeBackend};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_error_mapping() {
        assert!(matches!(
            map_error(HfError::ModelNotFound {
                model_id: "a/b".to_string(),
                branch: "main".to_string()
            }),
            FetchError::NotFound { .. }
        ));
        assert!(matches!(
            map_error(HfError::ApiRequestFailed {
                status: 503,
                url: "u".to_string()
            }),
            FetchError::Network {
                status_code: Some(503),
                ..
            }
        ));
        assert!(matches!(
            map_error(HfError::PageLimitExceeded { max_pages: 3 }),
            FetchError::Parse { .. }
        ));
        assert!(matches!(
            map_error(HfError::PaginationStalled {
                last_path: "x".to_string()
            }),
            FetchError::Parse { .. }
        ));
        assert!(matches!(
            map_error(HfError::InvalidResponse {
                message: "m".to_string()
            }),
            FetchError::Parse { .. }
        ));
        assert!(matches!(
            map_error(HfError::Timeout {
                url: "u".to_string()
            }),
            FetchError::Network {
                status_code: None,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_resolve_through_port_object() {
        let backend = FakeBackend::new()
            .with_response("cursor=", CannedResponse::json(json!([])))
            .with_response(
                "tree/main",
                CannedResponse::json(json!([{"type": "file", "path": "config.json", "size": 3}])),
            );
        let port: Arc<dyn ListingResolverPort> =
            Arc::new(HfClient::with_backend(test_config(), backend));

        let plan = port
            .resolve(&RepoRef::parse("org/model").unwrap(), &Branch::main(), false)
            .await
            .unwrap();
        assert_eq!(plan.files.len(), 1);
    }

    #[tokio::test]
    async fn test_not_found_through_port() {
        let backend = FakeBackend::new().with_response("tree/main", CannedResponse::status(404));
        let client = HfClient::with_backend(test_config(), backend);

        let err = client
            .resolve(&RepoRef::parse("org/missing").unwrap(), &Branch::main(), false)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotFound { .. }));
        assert!(!err.is_recoverable());
    }
}

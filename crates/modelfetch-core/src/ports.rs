//! Port traits implemented by adapter crates.

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::plan::DownloadPlan;
use crate::repo::{Branch, RepoRef};

/// Port trait for resolving a repository listing into a download plan.
///
/// The implementation lives in `modelfetch-hf`. Inputs are already
/// validated types, so an implementation never performs a network call for
/// a malformed model id or branch.
#[async_trait]
pub trait ListingResolverPort: Send + Sync {
    /// Resolve the files of `repo` at `branch` into a download plan.
    ///
    /// Fails as a whole: no partial plan is returned on error.
    async fn resolve(
        &self,
        repo: &RepoRef,
        branch: &Branch,
        text_only: bool,
    ) -> FetchResult<DownloadPlan>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    // Verify the trait is object-safe
    fn _assert_object_safe(_: Arc<dyn ListingResolverPort>) {}
}

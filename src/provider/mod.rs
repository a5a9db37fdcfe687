//! Pull request providers
//!
//! Provides the interface the orchestrator uses to discover labeled PRs.

mod github;

pub use github::{ClientCredentials, GitHubProvider, PAGE_SIZE};

use crate::error::Result;
use crate::types::{PullRequestRecord, RepositoryDescriptor};
use async_trait::async_trait;

/// Source of open pull requests carrying a label
///
/// Implementations return at most one bounded page of results per
/// repository. A failure to list is an error; a failure to resolve a single
/// PR's details is logged and that PR is left out.
#[async_trait]
pub trait PullRequestProvider: Send + Sync {
    /// List the open PRs of `repository` carrying `label`
    async fn list_labeled_pull_requests(
        &self,
        repository: &RepositoryDescriptor,
        label: &str,
    ) -> Result<Vec<PullRequestRecord>>;
}

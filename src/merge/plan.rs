//! Merge planning - pure functions for creating merge plans
//!
//! This module contains the pure, testable logic deciding which branches are
//! fetched and in what order they are merged. No I/O happens here.

use crate::registry::Registry;
use crate::types::{PullRequestRecord, RunSnapshot};

/// A single PR to fetch and merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStep {
    /// Remote the PR belongs to
    pub remote_name: String,
    /// Local branch the PR head is fetched into
    pub local_branch: String,
    /// The PR itself
    pub pull_request: PullRequestRecord,
}

impl MergeStep {
    /// Refspec fetching the PR head into its local branch
    pub fn refspec(&self) -> String {
        format!("pull/{}/head:{}", self.pull_request.number, self.local_branch)
    }
}

impl std::fmt::Display for MergeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PR #{} ({}) by {} from {}",
            self.pull_request.number,
            self.pull_request.head_ref,
            self.pull_request.author,
            self.remote_name
        )
    }
}

/// Ordered merge plan
///
/// Steps are in repository registration order, then in the order the
/// provider returned the repository's PRs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// Ordered steps to perform
    pub steps: Vec<MergeStep>,
}

impl MergePlan {
    /// Check if the plan has no steps
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of PRs in the plan
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

/// Local branch name for a PR's head
///
/// Named after the PR's ref, namespaced by remote and PR number so that two
/// PRs sharing a ref name (e.g. two forks' `master`) never collide.
pub fn local_branch_name(remote_name: &str, pr: &PullRequestRecord) -> String {
    format!("{remote_name}/{}-{}", pr.number, pr.head_ref)
}

/// Create a merge plan (PURE - no I/O, easily testable)
///
/// Repositories present in the snapshot but not in the registry are ignored.
#[must_use]
pub fn create_merge_plan(registry: &Registry, snapshot: &RunSnapshot) -> MergePlan {
    let steps = registry
        .repositories()
        .iter()
        .flat_map(|repo| {
            snapshot
                .pull_requests(&repo.remote_name)
                .iter()
                .map(move |pr| MergeStep {
                    remote_name: repo.remote_name.clone(),
                    local_branch: local_branch_name(&repo.remote_name, pr),
                    pull_request: pr.clone(),
                })
        })
        .collect();

    MergePlan { steps }
}

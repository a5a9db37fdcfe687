//! Core types for bleeding-edge-bot

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A source repository parsed from its URL
///
/// Only constructed through [`crate::registry::describe`], which guarantees a
/// non-empty owner and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    /// Repository URL as configured
    pub url: String,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
    /// Git remote name in the tracking clone (`owner_name`)
    pub remote_name: String,
}

/// An open pull request carrying the tracked label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRecord {
    /// PR number
    pub number: u64,
    /// Head commit SHA
    #[serde(rename = "commit")]
    pub head_commit: String,
    /// Head branch name
    #[serde(rename = "ref")]
    pub head_ref: String,
    /// Login of the PR author
    pub author: String,
}

/// All labeled PRs observed in one run, keyed by remote name
///
/// Equality is structural. Key order never matters; the order of PRs within
/// one repository does, because it is the merge order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunSnapshot {
    repositories: BTreeMap<String, Vec<PullRequestRecord>>,
}

impl RunSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the PRs found for one repository, replacing any previous entry
    pub fn insert(&mut self, remote_name: impl Into<String>, prs: Vec<PullRequestRecord>) {
        self.repositories.insert(remote_name.into(), prs);
    }

    /// PRs recorded for a repository (empty if the repository is unknown)
    pub fn pull_requests(&self, remote_name: &str) -> &[PullRequestRecord] {
        self.repositories
            .get(remote_name)
            .map_or(&[], Vec::as_slice)
    }

    /// Total number of PRs across all repositories
    pub fn pull_request_count(&self) -> usize {
        self.repositories.values().map(Vec::len).sum()
    }

    /// Whether no repository has any labeled PR
    pub fn is_empty(&self) -> bool {
        self.pull_request_count() == 0
    }
}

/// Result of attempting to merge one PR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeStatus {
    /// Merged cleanly into the integration branch
    Merged,
    /// Merge failed and was aborted
    Failed,
}

impl std::fmt::Display for MergeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Merged => write!(f, "Merged"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// One row of the merge log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// PR number
    pub number: u64,
    /// Head branch name
    pub head_ref: String,
    /// Head commit SHA
    pub head_commit: String,
    /// PR author
    pub author: String,
    /// What happened
    pub status: MergeStatus,
}

impl MergeOutcome {
    /// Build an outcome for a PR
    pub fn new(pr: &PullRequestRecord, status: MergeStatus) -> Self {
        Self {
            number: pr.number,
            head_ref: pr.head_ref.clone(),
            head_commit: pr.head_commit.clone(),
            author: pr.author.clone(),
            status,
        }
    }
}

/// A git remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitRemote {
    /// Remote name (e.g., "`push_remote`")
    pub name: String,
    /// Remote URL
    pub url: String,
}

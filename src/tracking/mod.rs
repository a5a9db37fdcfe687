//! Tracking repository manager
//!
//! Owns the tracking clone: a local checkout of the main repository with one
//! remote per source repository and one push remote. The clone is wiped and
//! rebuilt on every run, so leftovers of an interrupted run never leak into
//! the next one.

mod fs;

pub use fs::force_remove_dir_all;

use crate::error::{Error, Result};
use crate::merge::{MergeExecutionResult, MergePlan, execute_merge, write_report};
use crate::registry::PUSH_REMOTE_NAME;
use crate::types::{GitRemote, RepositoryDescriptor};
use crate::vcs::{CommandOutput, VersionControl};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Where the tracking clone lives and what it publishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingSettings {
    /// Working directory of the clone
    pub path: PathBuf,
    /// URL of the main repository
    pub main_repo: String,
    /// URL the integration branch is pushed to
    pub push_url: String,
    /// Main branch of the main repository
    pub base_branch: String,
    /// Branch rebuilt on every run
    pub integration_branch: String,
    /// Name used in the merge log header and commit message
    pub bot_name: String,
}

/// Lifecycle of the tracking clone within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneState {
    /// Nothing has been cloned yet this run
    Absent,
    /// Main repository cloned
    Cloned,
    /// Source and push remotes registered
    RemotesConfigured,
    /// Integration branch checked out
    BranchCreated,
    /// Merge pass in progress
    Merging,
    /// Merge pass finished and merge log written
    Reported,
    /// Integration branch published
    Pushed,
}

/// Manager of the tracking clone
pub struct TrackingRepo<'a> {
    vcs: &'a dyn VersionControl,
    settings: TrackingSettings,
    push_remote: GitRemote,
    state: CloneState,
}

impl<'a> TrackingRepo<'a> {
    /// Create a manager; nothing touches the disk until [`Self::recreate`]
    pub fn new(vcs: &'a dyn VersionControl, settings: TrackingSettings) -> Self {
        let push_remote = GitRemote {
            name: PUSH_REMOTE_NAME.to_string(),
            url: settings.push_url.clone(),
        };
        Self {
            vcs,
            settings,
            push_remote,
            state: CloneState::Absent,
        }
    }

    /// Current lifecycle state
    pub const fn state(&self) -> CloneState {
        self.state
    }

    fn require(&self, expected: CloneState) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::Internal(format!(
                "tracking clone is {:?}, expected {expected:?}",
                self.state
            )))
        }
    }

    fn transition(&mut self, next: CloneState) {
        debug!(from = ?self.state, to = ?next, "tracking clone state");
        self.state = next;
    }

    /// Delete any existing clone and build a fresh one
    ///
    /// Clones the main repository with its submodules, checking out the base
    /// branch, then registers one remote per source repository and the push
    /// remote.
    pub async fn recreate(&mut self, repositories: &[RepositoryDescriptor]) -> Result<()> {
        let path = self.settings.path.clone();

        if path.exists() {
            debug!(path = %path.display(), "removing tracking clone");
            force_remove_dir_all(&path).map_err(|e| {
                Error::CloneFailed(format!("could not remove {}: {e}", path.display()))
            })?;
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::CloneFailed(format!("could not create {}: {e}", parent.display()))
            })?;
        }
        self.state = CloneState::Absent;

        info!(repo = %self.settings.main_repo, "cloning main repository");
        let output = self
            .vcs
            .clone_recursive(&self.settings.main_repo, &path, &self.settings.base_branch)
            .await
            .map_err(|e| Error::CloneFailed(e.to_string()))?;
        expect_success(&output, || format!("clone of {}", self.settings.main_repo))?;
        self.transition(CloneState::Cloned);

        let remotes = repositories
            .iter()
            .map(|r| (r.remote_name.as_str(), r.url.as_str()))
            .chain(std::iter::once((
                self.push_remote.name.as_str(),
                self.push_remote.url.as_str(),
            )));
        for (name, url) in remotes {
            let output = self
                .vcs
                .remote_add(&path, name, url)
                .await
                .map_err(|e| Error::CloneFailed(e.to_string()))?;
            expect_success(&output, || format!("remote add {name}"))?;
        }
        self.transition(CloneState::RemotesConfigured);

        Ok(())
    }

    /// Force-push the base branch to the push remote
    pub async fn sync_base(&self) -> Result<()> {
        self.require(CloneState::RemotesConfigured)?;
        self.push(&self.settings.base_branch).await
    }

    /// Fetch every planned PR head into its local branch
    ///
    /// Returns the plan restricted to the PRs that were fetched; a failed
    /// fetch is logged and that PR is left out of the merge pass.
    pub async fn fetch_pr_branches(&self, plan: &MergePlan) -> Result<MergePlan> {
        self.require(CloneState::RemotesConfigured)?;

        let mut fetched = MergePlan::default();
        for step in &plan.steps {
            let result = self
                .vcs
                .fetch(&self.settings.path, &step.remote_name, &step.refspec())
                .await;
            let failure = match result {
                Ok(output) if output.success() => None,
                Ok(output) => Some(output.failure_reason()),
                Err(e) => Some(e.to_string()),
            };

            if let Some(reason) = failure {
                warn!(
                    remote = %step.remote_name,
                    pr_number = step.pull_request.number,
                    head_ref = %step.pull_request.head_ref,
                    reason = %reason,
                    "Could not fetch PR branch, leaving it out of the merge"
                );
            } else {
                fetched.steps.push(step.clone());
            }
        }

        debug!(planned = plan.len(), fetched = fetched.len(), "fetched PR branches");
        Ok(fetched)
    }

    /// Build the integration branch and record the merge log on it
    ///
    /// Creates the integration branch from the base branch, merges every step
    /// in order, then commits the merge log into the README.
    pub async fn merge_all(&mut self, plan: &MergePlan) -> Result<MergeExecutionResult> {
        self.require(CloneState::RemotesConfigured)?;
        let path = self.settings.path.clone();

        let output = self
            .vcs
            .checkout_new_branch(
                &path,
                &self.settings.integration_branch,
                &self.settings.base_branch,
            )
            .await?;
        if !output.success() {
            return Err(Error::Git(format!(
                "could not create branch {}: {}",
                self.settings.integration_branch,
                output.failure_reason()
            )));
        }
        self.transition(CloneState::BranchCreated);

        self.transition(CloneState::Merging);
        let result = execute_merge(plan, self.vcs, &path).await?;

        if !write_report(self.vcs, &path, &self.settings.bot_name, &result.outcomes).await {
            warn!("Merge log was not recorded on the integration branch");
        }
        self.transition(CloneState::Reported);

        Ok(result)
    }

    /// Delete the integration branch from the push remote
    ///
    /// Failure is logged only: the branch does not exist on a first run.
    pub async fn delete_remote_integration_branch(&self) -> Result<()> {
        self.require(CloneState::Reported)?;
        let branch = &self.settings.integration_branch;

        match self
            .vcs
            .push_delete(&self.settings.path, &self.push_remote.name, branch)
            .await
        {
            Ok(output) if output.success() => debug!(branch = %branch, "deleted remote branch"),
            Ok(output) => warn!(
                branch = %branch,
                reason = %output.failure_reason(),
                "Could not delete remote integration branch"
            ),
            Err(e) => warn!(branch = %branch, error = %e, "Could not delete remote integration branch"),
        }
        Ok(())
    }

    /// Force-push the integration branch to the push remote
    pub async fn publish_integration_branch(&mut self) -> Result<()> {
        self.require(CloneState::Reported)?;
        let branch = self.settings.integration_branch.clone();
        self.push(&branch).await?;
        self.transition(CloneState::Pushed);
        Ok(())
    }

    async fn push(&self, branch: &str) -> Result<()> {
        info!(branch, remote = %self.push_remote.url, "pushing");
        let output = self
            .vcs
            .push_force(&self.settings.path, &self.push_remote.name, branch)
            .await
            .map_err(|e| Error::PushFailed(format!("{branch}: {e}")))?;
        if output.success() {
            Ok(())
        } else {
            Err(Error::PushFailed(format!(
                "{branch}: {}",
                output.failure_reason()
            )))
        }
    }
}

fn expect_success(output: &CommandOutput, what: impl FnOnce() -> String) -> Result<()> {
    if output.success() {
        Ok(())
    } else {
        Err(Error::CloneFailed(format!(
            "{} failed: {}",
            what(),
            output.failure_reason()
        )))
    }
}

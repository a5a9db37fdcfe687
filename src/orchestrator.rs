//! Run orchestration
//!
//! One run: snapshot the labeled PRs, compare with the previous run, and if
//! anything changed rebuild and publish the integration branch. The stored
//! snapshot is only replaced once the branch has been pushed, so a failed run
//! is retried in full next time.

use crate::error::Result;
use crate::merge::{MergeExecutionResult, MergePlan, create_merge_plan};
use crate::provider::PullRequestProvider;
use crate::registry::Registry;
use crate::state::RunStateStore;
use crate::tracking::{TrackingRepo, TrackingSettings};
use crate::types::RunSnapshot;
use crate::vcs::VersionControl;
use tracing::{debug, info, warn};

/// Flags altering a run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Stop after planning: nothing is cloned, pushed or persisted
    pub dry_run: bool,
    /// Rebuild even if the labeled PRs are unchanged
    pub force: bool,
}

/// What a finished run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Labeled PRs match the previous run; nothing was touched
    Unchanged,
    /// No repository has a PR carrying the label
    NoLabeledPullRequests {
        /// The label that was searched for
        label: String,
    },
    /// Dry run: the merge that would have been attempted
    DryRun(MergePlan),
    /// Integration branch rebuilt and published
    Completed(RunSummary),
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Per-PR merge results
    pub merge: MergeExecutionResult,
    /// PRs whose branch could not be fetched
    pub skipped_fetches: usize,
}

/// Drives one run of the bot
pub struct Orchestrator<'a> {
    registry: &'a Registry,
    provider: &'a dyn PullRequestProvider,
    vcs: &'a dyn VersionControl,
    store: &'a RunStateStore,
    settings: TrackingSettings,
    label: String,
}

impl<'a> Orchestrator<'a> {
    /// Create an orchestrator over the given services
    pub fn new(
        registry: &'a Registry,
        provider: &'a dyn PullRequestProvider,
        vcs: &'a dyn VersionControl,
        store: &'a RunStateStore,
        settings: TrackingSettings,
        label: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            provider,
            vcs,
            store,
            settings,
            label: label.into(),
        }
    }

    /// Query every registered repository for labeled PRs
    ///
    /// Any listing failure aborts the run.
    pub async fn fetch_snapshot(&self) -> Result<RunSnapshot> {
        let mut snapshot = RunSnapshot::new();
        for repository in self.registry.repositories() {
            let prs = self
                .provider
                .list_labeled_pull_requests(repository, &self.label)
                .await?;
            debug!(
                remote = %repository.remote_name,
                count = prs.len(),
                "labeled PRs"
            );
            snapshot.insert(repository.remote_name.clone(), prs);
        }
        Ok(snapshot)
    }

    /// Execute one run
    pub async fn run(&self, options: &RunOptions) -> Result<RunOutcome> {
        let current = self.fetch_snapshot().await?;

        if !options.force {
            let previous = self.store.load()?;
            if RunStateStore::equals(&previous, &current) {
                info!("No changes since last run");
                return Ok(RunOutcome::Unchanged);
            }
        }

        if current.is_empty() {
            warn!(label = %self.label, "No PRs carry the label");
            return Ok(RunOutcome::NoLabeledPullRequests {
                label: self.label.clone(),
            });
        }

        let plan = create_merge_plan(self.registry, &current);
        info!(count = plan.len(), "Labeled PRs to merge");

        if options.dry_run {
            return Ok(RunOutcome::DryRun(plan));
        }

        let mut tracking = TrackingRepo::new(self.vcs, self.settings.clone());
        tracking.recreate(self.registry.repositories()).await?;
        tracking.sync_base().await?;

        let fetched = tracking.fetch_pr_branches(&plan).await?;
        let skipped_fetches = plan.len() - fetched.len();

        let merge = tracking.merge_all(&fetched).await?;
        if merge.failed_count > 0 {
            warn!(
                failed = merge.failed_count,
                merged = merge.merged_count(),
                "Some PRs failed to merge"
            );
        } else {
            info!(merged = merge.merged_count(), "All PRs merged");
        }

        tracking.delete_remote_integration_branch().await?;
        tracking.publish_integration_branch().await?;

        self.store.save(&current)?;
        info!(path = %self.store.path().display(), "Run state saved");

        Ok(RunOutcome::Completed(RunSummary {
            merge,
            skipped_fetches,
        }))
    }
}

//! Merge execution - effectful operations
//!
//! This module contains the effectful code that actually performs merges.
//! It takes a `MergePlan` (created by the pure planning functions) and
//! merges each step into the checked-out integration branch.

use crate::error::{Error, Result};
use crate::merge::plan::{MergePlan, MergeStep};
use crate::types::{MergeOutcome, MergeStatus};
use crate::vcs::VersionControl;
use std::path::Path;
use tracing::{debug, warn};

/// Result of merge execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeExecutionResult {
    /// One outcome per attempted PR, in attempt order
    pub outcomes: Vec<MergeOutcome>,
    /// Number of PRs that failed to merge
    pub failed_count: usize,
}

impl MergeExecutionResult {
    /// Check if all attempted merges succeeded
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed_count == 0
    }

    /// Number of PRs merged cleanly
    #[must_use]
    pub fn merged_count(&self) -> usize {
        self.outcomes.len() - self.failed_count
    }
}

/// Execute the merge plan (EFFECTFUL)
///
/// Merges every step into the currently checked-out branch of `repo`, in
/// plan order. A failed merge is aborted before the next step so it cannot
/// affect later merges; execution always continues.
///
/// Returns an error only if the working tree could not be restored after a
/// failed merge.
pub async fn execute_merge(
    plan: &MergePlan,
    vcs: &dyn VersionControl,
    repo: &Path,
) -> Result<MergeExecutionResult> {
    let mut result = MergeExecutionResult::default();

    for step in &plan.steps {
        let pr = &step.pull_request;
        debug!(pr_number = pr.number, branch = %step.local_branch, "merging");

        let failure = match vcs.merge(repo, &step.local_branch).await {
            Ok(output) if output.success() => None,
            Ok(output) => Some(output.failure_reason()),
            Err(e) => Some(e.to_string()),
        };

        let status = if let Some(reason) = failure {
            warn!(
                pr_number = pr.number,
                head_ref = %pr.head_ref,
                reason = %reason,
                "Branch failed to merge"
            );
            restore_clean_state(vcs, repo, step).await?;
            result.failed_count += 1;
            MergeStatus::Failed
        } else {
            debug!(pr_number = pr.number, "merged");
            MergeStatus::Merged
        };

        result.outcomes.push(MergeOutcome::new(pr, status));
    }

    Ok(result)
}

/// Abort an in-progress merge, falling back to a hard reset
async fn restore_clean_state(vcs: &dyn VersionControl, repo: &Path, step: &MergeStep) -> Result<()> {
    match vcs.merge_abort(repo).await {
        Ok(output) if output.success() => return Ok(()),
        Ok(output) => debug!(reason = %output.failure_reason(), "merge --abort failed"),
        Err(e) => debug!(error = %e, "merge --abort failed"),
    }

    match vcs.reset_hard(repo).await {
        Ok(output) if output.success() => Ok(()),
        Ok(output) => Err(Error::Git(format!(
            "could not restore working tree after {step}: {}",
            output.failure_reason()
        ))),
        Err(e) => Err(Error::Git(format!(
            "could not restore working tree after {step}: {e}"
        ))),
    }
}

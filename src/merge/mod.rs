//! Merge engine for labeled PRs
//!
//! Three-phase pattern:
//! 1. Plan - order the labeled PRs into a `MergePlan` (pure, testable)
//! 2. Execute - merge each step into the integration branch (effectful)
//! 3. Report - render the merge log and commit it into the README

mod execute;
mod plan;
mod report;

pub use execute::{MergeExecutionResult, execute_merge};
pub use plan::{MergePlan, MergeStep, create_merge_plan, local_branch_name};
pub use report::{README_FILE, commit_message, render_merge_table, render_report, write_report};

//! Run command - rebuild the integration branch if labeled PRs changed

use crate::cli::context::CommandContext;
use crate::cli::style::{Stylize, arrow, check, cross};
use anstream::println;
use bleeding_edge_bot::error::Result;
use bleeding_edge_bot::merge::MergePlan;
use bleeding_edge_bot::types::MergeStatus;
use bleeding_edge_bot::{RunOptions, RunOutcome, RunSummary};

/// Run the bot once and print what happened
pub async fn run_bot(ctx: &CommandContext, options: RunOptions) -> Result<RunOutcome> {
    let outcome = ctx.orchestrator().run(&options).await?;
    print_outcome(ctx, &outcome);
    Ok(outcome)
}

fn print_outcome(ctx: &CommandContext, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Unchanged => {
            println!("{}", "No changes since last run, nothing to do".muted());
        }
        RunOutcome::NoLabeledPullRequests { label } => {
            println!(
                "{} no open PRs carry {}",
                cross(),
                label.accent()
            );
        }
        RunOutcome::DryRun(plan) => print_plan(plan),
        RunOutcome::Completed(summary) => {
            print_summary(ctx, summary);
        }
    }
}

fn print_plan(plan: &MergePlan) {
    println!("{}:", "Merge plan".emphasis());
    println!();
    for step in &plan.steps {
        println!("  {} {}", arrow(), step);
    }
    println!();
    println!("{}", "Dry run complete, nothing was pushed".muted());
}

fn print_summary(ctx: &CommandContext, summary: &RunSummary) {
    for outcome in &summary.merge.outcomes {
        let mark = match outcome.status {
            MergeStatus::Merged => check(),
            MergeStatus::Failed => cross(),
        };
        println!(
            "  {mark} #{} {} {}",
            outcome.number.accent(),
            outcome.head_ref,
            format!("by {}", outcome.author).muted()
        );
    }
    if summary.skipped_fetches > 0 {
        println!(
            "  {} {} PR branch(es) could not be fetched",
            cross(),
            summary.skipped_fetches.warn()
        );
    }

    println!();
    let headline = format!(
        "{} {} pushed:",
        check(),
        ctx.config.integration_branch
    );
    println!(
        "{} {} merged, {} failed",
        headline.success(),
        summary.merge.merged_count().accent(),
        if summary.merge.failed_count > 0 {
            summary.merge.failed_count.warn()
        } else {
            summary.merge.failed_count.accent()
        }
    );
}

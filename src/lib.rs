//! bleeding-edge-bot: rolling integration branch for labeled pull requests
//!
//! Collects every open pull request carrying a configured label across a set
//! of GitHub repositories, merges them one by one on top of the main branch,
//! records a merge log in the README and force-pushes the result.
//!
//! Runs are idempotent: when the labeled PRs (and their head commits) have
//! not changed since the last successful run, nothing is rebuilt.

pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod orchestrator;
pub mod provider;
pub mod registry;
pub mod state;
pub mod tracking;
pub mod types;
pub mod vcs;

pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, RunOptions, RunOutcome, RunSummary};

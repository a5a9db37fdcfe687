//! Shared test utilities

#![allow(dead_code)]

pub mod mock_provider;
pub mod mock_vcs;
pub mod temp_git;

pub use mock_provider::MockProvider;
pub use mock_vcs::{MockVcs, VcsCall};
pub use temp_git::{TempGitRemotes, git_available};

use bleeding_edge_bot::registry::Registry;
use bleeding_edge_bot::tracking::TrackingSettings;
use bleeding_edge_bot::types::PullRequestRecord;
use std::path::Path;

/// Build a PR record with predictable fields
pub fn make_pr(number: u64, head_ref: &str) -> PullRequestRecord {
    PullRequestRecord {
        number,
        head_commit: format!("{number:040x}"),
        head_ref: head_ref.to_string(),
        author: format!("dev{number}"),
    }
}

/// Registry over the given `owner/name` pairs on github.com
pub fn make_registry(repos: &[&str]) -> Registry {
    Registry::new(repos.iter().map(|r| format!("https://github.com/{r}"))).unwrap()
}

/// Tracking settings with the clone placed under `dir`
pub fn make_settings(dir: &Path) -> TrackingSettings {
    TrackingSettings {
        path: dir.join("tracking_repo"),
        main_repo: "https://github.com/citra-emu/citra".to_string(),
        push_url: "git@github.com:citra-emu/citra-bleeding-edge".to_string(),
        base_branch: "master".to_string(),
        integration_branch: "bleeding_edge".to_string(),
        bot_name: "lemonbot".to_string(),
    }
}

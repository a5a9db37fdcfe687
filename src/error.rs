//! Error types for bleeding-edge-bot

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while aggregating labeled pull requests
#[derive(Debug, Error)]
pub enum Error {
    /// Repository URL has fewer than two path segments (owner and name)
    #[error("malformed repository URL: {0}")]
    MalformedRepositoryUrl(String),

    /// Two configured repositories derive the same remote name
    #[error("duplicate remote name '{0}' (two repositories share an owner and name)")]
    DuplicateRemote(String),

    /// The pull request listing could not be retrieved
    #[error("pull request provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Cloning the main repository or configuring its remotes failed
    #[error("failed to create tracking clone: {0}")]
    CloneFailed(String),

    /// Pushing to the push remote failed
    #[error("push failed: {0}")]
    PushFailed(String),

    /// A git invocation exceeded its time budget and was killed
    #[error("git {command} timed out after {seconds}s")]
    OperationTimedOut {
        /// The git subcommand that was running
        command: String,
        /// Timeout that was exceeded
        seconds: u64,
    },

    /// Git could not be run, or a required git step failed
    #[error("git error: {0}")]
    Git(String),

    /// Reading or writing the run-state file failed
    #[error("run state error: {0}")]
    RunState(String),

    /// Configuration is missing or invalid
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invariant violation inside the bot
    #[error("internal error: {0}")]
    Internal(String),
}

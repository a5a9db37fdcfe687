//! Version control capability
//!
//! Every repository operation the bot performs goes through
//! [`VersionControl`], one method per git invocation. The orchestration code
//! only looks at the structured [`CommandOutput`], so tests can substitute a
//! fake implementation.

mod git;

pub use git::GitCli;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Captured result of one version control invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (`None` if the process was killed by a signal)
    pub code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// A successful, silent invocation
    pub fn ok() -> Self {
        Self {
            code: Some(0),
            ..Self::default()
        }
    }

    /// A failed invocation with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the process exited with status 0
    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }

    /// Short human-readable reason for a failure
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        let code = self
            .code
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        if stderr.is_empty() {
            format!("exit status {code}")
        } else {
            format!("exit status {code}: {stderr}")
        }
    }
}

/// Version control operations used on the tracking clone
///
/// `Err` is reserved for invocations that could not run to completion
/// (spawn failure, timeout). A command that ran and exited nonzero returns
/// `Ok` with a non-success [`CommandOutput`]; callers decide whether that is
/// fatal.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// `clone --recursive --branch <branch> <url> <dest>`
    async fn clone_recursive(&self, url: &str, dest: &Path, branch: &str)
    -> Result<CommandOutput>;

    /// `remote add <name> <url>`
    async fn remote_add(&self, repo: &Path, name: &str, url: &str) -> Result<CommandOutput>;

    /// `fetch <remote> <refspec>`
    async fn fetch(&self, repo: &Path, remote: &str, refspec: &str) -> Result<CommandOutput>;

    /// `checkout -b <branch> <start_point>`
    async fn checkout_new_branch(
        &self,
        repo: &Path,
        branch: &str,
        start_point: &str,
    ) -> Result<CommandOutput>;

    /// `merge --no-edit <branch>`
    async fn merge(&self, repo: &Path, branch: &str) -> Result<CommandOutput>;

    /// `merge --abort`
    async fn merge_abort(&self, repo: &Path) -> Result<CommandOutput>;

    /// `reset --hard HEAD`
    async fn reset_hard(&self, repo: &Path) -> Result<CommandOutput>;

    /// `add <path>`
    async fn add(&self, repo: &Path, path: &str) -> Result<CommandOutput>;

    /// `commit -m <message>`
    async fn commit(&self, repo: &Path, message: &str) -> Result<CommandOutput>;

    /// `push -f <remote> <branch>`
    async fn push_force(&self, repo: &Path, remote: &str, branch: &str) -> Result<CommandOutput>;

    /// `push <remote> --delete <branch>`
    async fn push_delete(&self, repo: &Path, remote: &str, branch: &str) -> Result<CommandOutput>;
}

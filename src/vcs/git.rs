//! Git command-line implementation of [`VersionControl`]

use crate::error::{Error, Result};
use crate::vcs::{CommandOutput, VersionControl};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Runs the `git` binary as a subprocess
///
/// Each invocation is bounded by a timeout; when it expires the child is
/// killed and [`Error::OperationTimedOut`] is returned. Git never prompts:
/// stdin is closed and `GIT_TERMINAL_PROMPT=0` is set.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    timeout: Duration,
    env: Vec<(String, String)>,
}

impl GitCli {
    /// Create a git runner with the given per-invocation timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "git".to_string(),
            timeout,
            env: vec![("GIT_TERMINAL_PROMPT".to_string(), "0".to_string())],
        }
    }

    /// Use a different git executable
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Author and commit merges and the merge log as this identity
    #[must_use]
    pub fn with_identity(mut self, name: &str, email: &str) -> Self {
        for key in ["GIT_AUTHOR_NAME", "GIT_COMMITTER_NAME"] {
            self.env.push((key.to_string(), name.to_string()));
        }
        for key in ["GIT_AUTHOR_EMAIL", "GIT_COMMITTER_EMAIL"] {
            self.env.push((key.to_string(), email.to_string()));
        }
        self
    }

    async fn run(&self, cwd: &Path, args: &[&str]) -> Result<CommandOutput> {
        let subcommand = args.first().copied().unwrap_or_default();
        debug!(cwd = %cwd.display(), command = %args.join(" "), "git command");

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(cwd)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = cmd
            .spawn()
            .map_err(|e| Error::Git(format!("failed to run {} {subcommand}: {e}", self.program)))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| Error::OperationTimedOut {
                command: subcommand.to_string(),
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| Error::Git(format!("failed to wait for git {subcommand}: {e}")))?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.stdout.is_empty() {
            debug!(stdout = %result.stdout.trim_end(), "git stdout");
        }
        if !result.stderr.is_empty() {
            debug!(stderr = %result.stderr.trim_end(), "git stderr");
        }
        debug!(command = subcommand, code = ?result.code, "git finished");

        Ok(result)
    }
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(Duration::from_secs(600))
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn clone_recursive(
        &self,
        url: &str,
        dest: &Path,
        branch: &str,
    ) -> Result<CommandOutput> {
        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        // git resolves the destination against its working directory
        let dir_name = dest
            .file_name()
            .ok_or_else(|| Error::Git(format!("invalid clone destination {}", dest.display())))?
            .to_string_lossy()
            .into_owned();
        self.run(
            parent,
            &["clone", "--recursive", "--branch", branch, url, dir_name.as_str()],
        )
        .await
    }

    async fn remote_add(&self, repo: &Path, name: &str, url: &str) -> Result<CommandOutput> {
        self.run(repo, &["remote", "add", name, url]).await
    }

    async fn fetch(&self, repo: &Path, remote: &str, refspec: &str) -> Result<CommandOutput> {
        self.run(repo, &["fetch", remote, refspec]).await
    }

    async fn checkout_new_branch(
        &self,
        repo: &Path,
        branch: &str,
        start_point: &str,
    ) -> Result<CommandOutput> {
        self.run(repo, &["checkout", "-b", branch, start_point]).await
    }

    async fn merge(&self, repo: &Path, branch: &str) -> Result<CommandOutput> {
        self.run(repo, &["merge", "--no-edit", branch]).await
    }

    async fn merge_abort(&self, repo: &Path) -> Result<CommandOutput> {
        self.run(repo, &["merge", "--abort"]).await
    }

    async fn reset_hard(&self, repo: &Path) -> Result<CommandOutput> {
        self.run(repo, &["reset", "--hard", "HEAD"]).await
    }

    async fn add(&self, repo: &Path, path: &str) -> Result<CommandOutput> {
        self.run(repo, &["add", path]).await
    }

    async fn commit(&self, repo: &Path, message: &str) -> Result<CommandOutput> {
        self.run(repo, &["commit", "-m", message]).await
    }

    async fn push_force(&self, repo: &Path, remote: &str, branch: &str) -> Result<CommandOutput> {
        self.run(repo, &["push", "-f", remote, branch]).await
    }

    async fn push_delete(&self, repo: &Path, remote: &str, branch: &str) -> Result<CommandOutput> {
        self.run(repo, &["push", remote, "--delete", branch]).await
    }
}

//! Mock version control for testing
//!
//! Records every invocation instead of running git. `clone_recursive`
//! creates the destination directory (optionally seeded with a README) so
//! the merge log can be written to disk as with a real clone.

use async_trait::async_trait;
use bleeding_edge_bot::error::{Error, Result};
use bleeding_edge_bot::vcs::{CommandOutput, VersionControl};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One recorded invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsCall {
    Clone {
        url: String,
        dest: PathBuf,
        branch: String,
    },
    RemoteAdd { name: String, url: String },
    Fetch { remote: String, refspec: String },
    CheckoutNewBranch { branch: String, start_point: String },
    Merge { branch: String },
    MergeAbort,
    ResetHard,
    Add { path: String },
    Commit { message: String },
    PushForce { remote: String, branch: String },
    PushDelete { remote: String, branch: String },
}

/// Hand-written version control fake
///
/// Features:
/// - Call tracking in invocation order
/// - Nonzero exits injected per branch, per PR fetch or per operation
/// - Spawn errors injected for clone
/// - Snapshot of the README at commit time
#[derive(Default)]
pub struct MockVcs {
    calls: Mutex<Vec<VcsCall>>,
    readme: Mutex<Option<String>>,
    committed_readme: Mutex<Option<String>>,
    // Error injection
    clone_error: Mutex<Option<String>>,
    failing_fetches: Mutex<HashSet<u64>>,
    failing_merges: Mutex<HashSet<String>>,
    failing_pushes: Mutex<HashSet<String>>,
    fail_abort: Mutex<bool>,
    fail_reset: Mutex<bool>,
    fail_delete: Mutex<bool>,
    fail_commit: Mutex<bool>,
}

impl MockVcs {
    /// Create a fake where every invocation succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every clone with a README containing `content`
    pub fn with_readme(self, content: &str) -> Self {
        *self.readme.lock().unwrap() = Some(content.to_string());
        self
    }

    // === Error injection methods ===

    /// Make `clone_recursive` return a spawn error
    pub fn fail_clone(&self, msg: &str) {
        *self.clone_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Make fetching PR `number` exit nonzero
    pub fn fail_fetch(&self, number: u64) {
        self.failing_fetches.lock().unwrap().insert(number);
    }

    /// Make merging `branch` exit nonzero
    pub fn fail_merge(&self, branch: &str) {
        self.failing_merges.lock().unwrap().insert(branch.to_string());
    }

    /// Make force-pushing `branch` exit nonzero
    pub fn fail_push(&self, branch: &str) {
        self.failing_pushes.lock().unwrap().insert(branch.to_string());
    }

    /// Make `merge --abort` exit nonzero
    pub fn fail_abort(&self) {
        *self.fail_abort.lock().unwrap() = true;
    }

    /// Make `reset --hard` exit nonzero
    pub fn fail_reset(&self) {
        *self.fail_reset.lock().unwrap() = true;
    }

    /// Make `push --delete` exit nonzero
    pub fn fail_delete(&self) {
        *self.fail_delete.lock().unwrap() = true;
    }

    /// Make `commit` exit nonzero
    pub fn fail_commit(&self) {
        *self.fail_commit.lock().unwrap() = true;
    }

    /// Clear every injected failure
    pub fn clear_failures(&self) {
        *self.clone_error.lock().unwrap() = None;
        self.failing_fetches.lock().unwrap().clear();
        self.failing_merges.lock().unwrap().clear();
        self.failing_pushes.lock().unwrap().clear();
        *self.fail_abort.lock().unwrap() = false;
        *self.fail_reset.lock().unwrap() = false;
        *self.fail_delete.lock().unwrap() = false;
        *self.fail_commit.lock().unwrap() = false;
    }

    // === Call inspection ===

    /// Every call in invocation order
    pub fn calls(&self) -> Vec<VcsCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget recorded calls
    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Branches passed to `merge`, in order
    pub fn merged_branches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                VcsCall::Merge { branch } => Some(branch),
                _ => None,
            })
            .collect()
    }

    /// Branches force-pushed, in order
    pub fn pushed_branches(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                VcsCall::PushForce { branch, .. } => Some(branch),
                _ => None,
            })
            .collect()
    }

    /// README content at the time of the last commit
    pub fn committed_readme(&self) -> Option<String> {
        self.committed_readme.lock().unwrap().clone()
    }

    fn record(&self, call: VcsCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn exit(success: bool) -> CommandOutput {
    if success {
        CommandOutput::ok()
    } else {
        CommandOutput::failed(1, "injected failure")
    }
}

#[async_trait]
impl VersionControl for MockVcs {
    async fn clone_recursive(
        &self,
        url: &str,
        dest: &Path,
        branch: &str,
    ) -> Result<CommandOutput> {
        self.record(VcsCall::Clone {
            url: url.to_string(),
            dest: dest.to_path_buf(),
            branch: branch.to_string(),
        });
        if let Some(msg) = self.clone_error.lock().unwrap().clone() {
            return Err(Error::Git(msg));
        }

        std::fs::create_dir_all(dest)?;
        if let Some(readme) = self.readme.lock().unwrap().as_deref() {
            std::fs::write(dest.join("README.md"), readme)?;
        }
        Ok(CommandOutput::ok())
    }

    async fn remote_add(&self, _repo: &Path, name: &str, url: &str) -> Result<CommandOutput> {
        self.record(VcsCall::RemoteAdd {
            name: name.to_string(),
            url: url.to_string(),
        });
        Ok(CommandOutput::ok())
    }

    async fn fetch(&self, _repo: &Path, remote: &str, refspec: &str) -> Result<CommandOutput> {
        self.record(VcsCall::Fetch {
            remote: remote.to_string(),
            refspec: refspec.to_string(),
        });
        let failing = self
            .failing_fetches
            .lock()
            .unwrap()
            .iter()
            .any(|n| refspec.starts_with(&format!("pull/{n}/head:")));
        Ok(exit(!failing))
    }

    async fn checkout_new_branch(
        &self,
        _repo: &Path,
        branch: &str,
        start_point: &str,
    ) -> Result<CommandOutput> {
        self.record(VcsCall::CheckoutNewBranch {
            branch: branch.to_string(),
            start_point: start_point.to_string(),
        });
        Ok(CommandOutput::ok())
    }

    async fn merge(&self, _repo: &Path, branch: &str) -> Result<CommandOutput> {
        self.record(VcsCall::Merge {
            branch: branch.to_string(),
        });
        let failing = self.failing_merges.lock().unwrap().contains(branch);
        Ok(exit(!failing))
    }

    async fn merge_abort(&self, _repo: &Path) -> Result<CommandOutput> {
        self.record(VcsCall::MergeAbort);
        Ok(exit(!*self.fail_abort.lock().unwrap()))
    }

    async fn reset_hard(&self, _repo: &Path) -> Result<CommandOutput> {
        self.record(VcsCall::ResetHard);
        Ok(exit(!*self.fail_reset.lock().unwrap()))
    }

    async fn add(&self, _repo: &Path, path: &str) -> Result<CommandOutput> {
        self.record(VcsCall::Add {
            path: path.to_string(),
        });
        Ok(CommandOutput::ok())
    }

    async fn commit(&self, repo: &Path, message: &str) -> Result<CommandOutput> {
        self.record(VcsCall::Commit {
            message: message.to_string(),
        });
        if *self.fail_commit.lock().unwrap() {
            return Ok(exit(false));
        }
        *self.committed_readme.lock().unwrap() =
            std::fs::read_to_string(repo.join("README.md")).ok();
        Ok(CommandOutput::ok())
    }

    async fn push_force(&self, _repo: &Path, remote: &str, branch: &str) -> Result<CommandOutput> {
        self.record(VcsCall::PushForce {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        let failing = self.failing_pushes.lock().unwrap().contains(branch);
        Ok(exit(!failing))
    }

    async fn push_delete(&self, _repo: &Path, remote: &str, branch: &str) -> Result<CommandOutput> {
        self.record(VcsCall::PushDelete {
            remote: remote.to_string(),
            branch: branch.to_string(),
        });
        Ok(exit(!*self.fail_delete.lock().unwrap()))
    }
}

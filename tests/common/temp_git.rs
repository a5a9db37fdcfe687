//! Real git repositories in a temp directory
//!
//! Builds a bare "source" repository whose `refs/pull/<n>/head` refs point at
//! three feature branches, plus an empty bare repository to push to:
//!
//! - PR 1 adds `a.txt`
//! - PR 2 rewrites `base.txt`, which master also rewrote (conflicts)
//! - PR 3 adds `c.txt`
//!
//! Besides the default `master`, the source has a `develop` branch (master
//! plus `develop.txt`) for runs against a non-default base branch.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Whether a usable git binary is on `PATH`
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|o| o.status.success())
}

/// Run git in `dir`, panicking on failure, and return trimmed stdout
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false", "-c", "init.defaultBranch=master"])
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Source and push repositories for end-to-end tests
pub struct TempGitRemotes {
    /// Keeps the directory alive
    pub dir: TempDir,
    /// Bare repository standing in for the GitHub repository
    pub source: PathBuf,
    /// Bare repository the integration branch is pushed to
    pub push: PathBuf,
}

impl TempGitRemotes {
    /// Build the repositories described in the module docs
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let work = dir.path().join("work");
        std::fs::create_dir_all(&work).unwrap();

        git(&work, &["init"]);
        git(&work, &["symbolic-ref", "HEAD", "refs/heads/master"]);
        std::fs::write(work.join("README.md"), "Hello").unwrap();
        std::fs::write(work.join("base.txt"), "base\n").unwrap();
        git(&work, &["add", "."]);
        git(&work, &["commit", "-m", "initial"]);

        let pr_a = commit_on_branch(&work, "feature-a", "a.txt", "a\n");
        let pr_b = commit_on_branch(&work, "feature-b", "base.txt", "from b\n");
        let pr_c = commit_on_branch(&work, "feature-c", "c.txt", "c\n");

        std::fs::write(work.join("base.txt"), "from master\n").unwrap();
        git(&work, &["commit", "-am", "master moves on"]);
        commit_on_branch(&work, "develop", "develop.txt", "develop\n");

        let source = dir.path().join("source.git");
        git(
            dir.path(),
            &["clone", "--bare", work.to_str().unwrap(), source.to_str().unwrap()],
        );
        for (number, sha) in [(1, &pr_a), (2, &pr_b), (3, &pr_c)] {
            git(&source, &["update-ref", &format!("refs/pull/{number}/head"), sha]);
        }

        let push = dir.path().join("push.git");
        std::fs::create_dir_all(&push).unwrap();
        git(&push, &["init", "--bare"]);

        Self { dir, source, push }
    }

    /// URL of the source repository
    pub fn source_url(&self) -> String {
        self.source.to_string_lossy().into_owned()
    }

    /// URL of the push repository
    pub fn push_url(&self) -> String {
        self.push.to_string_lossy().into_owned()
    }

    /// Contents of `path` on `branch` of the push repository, if present
    pub fn pushed_file(&self, branch: &str, path: &str) -> Option<String> {
        let output = Command::new("git")
            .args(["show", &format!("{branch}:{path}")])
            .current_dir(&self.push)
            .output()
            .expect("failed to run git");
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Head commit SHA of `rev` in the source repository
    pub fn source_sha(&self, rev: &str) -> String {
        git(&self.source, &["rev-parse", rev])
    }
}

fn commit_on_branch(work: &Path, branch: &str, file: &str, content: &str) -> String {
    git(work, &["checkout", "-b", branch, "master"]);
    std::fs::write(work.join(file), content).unwrap();
    git(work, &["add", file]);
    git(work, &["commit", "-m", branch]);
    let sha = git(work, &["rev-parse", "HEAD"]);
    git(work, &["checkout", "master"]);
    sha
}

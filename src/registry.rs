//! Repository registry
//!
//! Parses configured repository URLs into [`RepositoryDescriptor`]s and keeps
//! them in registration order, which is also the merge order.

use crate::error::{Error, Result};
use crate::types::RepositoryDescriptor;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Name of the remote the integration branch is pushed to
pub const PUSH_REMOTE_NAME: &str = "push_remote";

static SEGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid regex"));

/// Parse a repository URL into a descriptor
///
/// Accepts scheme URLs (`https://github.com/owner/name`) and scp-like SSH
/// locators (`git@github.com:owner/name.git`). The first two path segments are
/// the owner and the name; a trailing `.git` is stripped.
pub fn describe(url: &str) -> Result<RepositoryDescriptor> {
    let path = repository_path(url)?;
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let [owner, name, ..] = segments.as_slice() else {
        return Err(Error::MalformedRepositoryUrl(url.to_string()));
    };
    let name = name.strip_suffix(".git").unwrap_or(name);

    if !SEGMENT_RE.is_match(owner) || !SEGMENT_RE.is_match(name) {
        return Err(Error::MalformedRepositoryUrl(url.to_string()));
    }

    Ok(RepositoryDescriptor {
        url: url.to_string(),
        owner: (*owner).to_string(),
        name: name.to_string(),
        remote_name: format!("{owner}_{name}"),
    })
}

/// Extract the path component of a repository locator
fn repository_path(url: &str) -> Result<String> {
    if let Ok(parsed) = Url::parse(url) {
        return Ok(parsed.path().to_string());
    }

    // scp-like syntax: [user@]host:path
    match url.split_once(':') {
        Some((host, path)) if !host.is_empty() && !host.contains('/') => Ok(path.to_string()),
        _ => Err(Error::MalformedRepositoryUrl(url.to_string())),
    }
}

/// The ordered set of source repositories
#[derive(Debug, Clone)]
pub struct Registry {
    repositories: Vec<RepositoryDescriptor>,
}

impl Registry {
    /// Describe every URL, preserving order
    ///
    /// Fails if two URLs derive the same remote name, or one collides with
    /// the push remote.
    pub fn new<I, S>(urls: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut repositories = Vec::new();

        for url in urls {
            let descriptor = describe(url.as_ref())?;
            if descriptor.remote_name == PUSH_REMOTE_NAME
                || !seen.insert(descriptor.remote_name.clone())
            {
                return Err(Error::DuplicateRemote(descriptor.remote_name));
            }
            repositories.push(descriptor);
        }

        Ok(Self { repositories })
    }

    /// Repositories in registration order
    pub fn repositories(&self) -> &[RepositoryDescriptor] {
        &self.repositories
    }
}

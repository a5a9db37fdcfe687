//! Mock PR provider for testing

use async_trait::async_trait;
use bleeding_edge_bot::error::{Error, Result};
use bleeding_edge_bot::provider::PullRequestProvider;
use bleeding_edge_bot::types::{PullRequestRecord, RepositoryDescriptor};
use std::collections::HashMap;
use std::sync::Mutex;

/// Hand-written provider with canned responses per remote name
///
/// Features:
/// - Configurable PR list per repository (unknown repositories return none)
/// - Call tracking for verification
/// - Error injection per repository
#[derive(Default)]
pub struct MockProvider {
    responses: Mutex<HashMap<String, Vec<PullRequestRecord>>>,
    failures: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockProvider {
    /// Create a provider with no labeled PRs anywhere
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the PRs returned for a remote
    pub fn set_pull_requests(&self, remote_name: &str, prs: Vec<PullRequestRecord>) {
        self.responses
            .lock()
            .unwrap()
            .insert(remote_name.to_string(), prs);
    }

    /// Make listing a remote fail
    pub fn fail_listing(&self, remote_name: &str, msg: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(remote_name.to_string(), msg.to_string());
    }

    /// Stop failing a remote
    pub fn clear_failures(&self) {
        self.failures.lock().unwrap().clear();
    }

    /// `(remote_name, label)` pairs queried so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PullRequestProvider for MockProvider {
    async fn list_labeled_pull_requests(
        &self,
        repository: &RepositoryDescriptor,
        label: &str,
    ) -> Result<Vec<PullRequestRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push((repository.remote_name.clone(), label.to_string()));

        if let Some(msg) = self.failures.lock().unwrap().get(&repository.remote_name) {
            return Err(Error::ProviderUnavailable(msg.clone()));
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(&repository.remote_name)
            .cloned()
            .unwrap_or_default())
    }
}

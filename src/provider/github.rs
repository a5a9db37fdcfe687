//! GitHub pull request provider

use crate::error::{Error, Result};
use crate::provider::PullRequestProvider;
use crate::types::{PullRequestRecord, RepositoryDescriptor};
use async_trait::async_trait;
use reqwest::header::LINK;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Number of issues requested per listing call (GitHub's maximum page size)
pub const PAGE_SIZE: usize = 100;

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// OAuth application credentials passed as query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
}

#[derive(Deserialize)]
struct Issue {
    number: u64,
    pull_request: Option<IssuePullRequest>,
}

#[derive(Deserialize)]
struct IssuePullRequest {
    url: String,
}

#[derive(Deserialize)]
struct PullRequestDetail {
    number: u64,
    head: PullRequestHead,
    user: Option<PullRequestUser>,
}

#[derive(Deserialize)]
struct PullRequestHead {
    sha: String,
    #[serde(rename = "ref")]
    ref_field: String,
}

#[derive(Deserialize)]
struct PullRequestUser {
    login: String,
}

impl From<PullRequestDetail> for PullRequestRecord {
    fn from(pr: PullRequestDetail) -> Self {
        Self {
            number: pr.number,
            head_commit: pr.head.sha,
            head_ref: pr.head.ref_field,
            author: pr.user.map(|u| u.login).unwrap_or_default(),
        }
    }
}

/// GitHub provider using the REST issues and pulls endpoints
pub struct GitHubProvider {
    client: Client,
    api_url: String,
    credentials: Option<ClientCredentials>,
}

impl GitHubProvider {
    /// Create a new GitHub provider
    ///
    /// `api_url` is the REST root, e.g. `https://api.github.com`.
    pub fn new(
        api_url: &str,
        user_agent: &str,
        credentials: Option<ClientCredentials>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Internal(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn credential_params(&self) -> Vec<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|c| {
                vec![
                    ("client_id", c.client_id.as_str()),
                    ("client_secret", c.client_secret.as_str()),
                ]
            })
            .unwrap_or_default()
    }

    async fn list_issues(&self, repository: &RepositoryDescriptor, label: &str) -> Result<Vec<Issue>> {
        let url = format!(
            "{}/repos/{}/{}/issues",
            self.api_url, repository.owner, repository.name
        );
        let per_page = PAGE_SIZE.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("labels", label), ("per_page", per_page.as_str())])
            .query(&self.credential_params())
            .send()
            .await
            .map_err(|e| {
                Error::ProviderUnavailable(format!(
                    "could not list pull requests for {}: {e}",
                    repository.remote_name
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ProviderUnavailable(format!(
                "could not list pull requests for {}: status {status}",
                repository.remote_name
            )));
        }

        let more_pages = has_next_page(&response);
        let issues: Vec<Issue> = response.json().await.map_err(|e| {
            Error::ProviderUnavailable(format!(
                "could not parse issue listing for {}: {e}",
                repository.remote_name
            ))
        })?;

        if more_pages || issues.len() >= PAGE_SIZE {
            warn!(
                repository = %repository.remote_name,
                label,
                count = issues.len(),
                "Issue listing hit the page limit; PRs beyond the first page are not merged"
            );
        }

        Ok(issues)
    }

    async fn get_pull_request(&self, url: &str) -> Result<PullRequestDetail> {
        let response = self
            .client
            .get(url)
            .query(&self.credential_params())
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

fn has_next_page(response: &Response) -> bool {
    response
        .headers()
        .get(LINK)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("rel=\"next\""))
}

#[async_trait]
impl PullRequestProvider for GitHubProvider {
    async fn list_labeled_pull_requests(
        &self,
        repository: &RepositoryDescriptor,
        label: &str,
    ) -> Result<Vec<PullRequestRecord>> {
        debug!(repository = %repository.remote_name, label, "listing labeled issues");
        let issues = self.list_issues(repository, label).await?;

        let mut result = Vec::new();
        for issue in issues {
            let Some(pull_request) = issue.pull_request else {
                debug!(issue = issue.number, "labeled issue is not a pull request, skipping");
                continue;
            };

            match self.get_pull_request(&pull_request.url).await {
                Ok(detail) => result.push(PullRequestRecord::from(detail)),
                Err(e) => {
                    warn!(
                        repository = %repository.remote_name,
                        pr_number = issue.number,
                        error = %e,
                        "Couldn't fetch PR details, skipping"
                    );
                }
            }
        }

        debug!(
            repository = %repository.remote_name,
            count = result.len(),
            "listed labeled pull requests"
        );
        Ok(result)
    }
}

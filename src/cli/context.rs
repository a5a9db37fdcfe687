//! Shared command context
//!
//! Builds every service a run needs from the loaded configuration.

use bleeding_edge_bot::Orchestrator;
use bleeding_edge_bot::config::Config;
use bleeding_edge_bot::error::Result;
use bleeding_edge_bot::provider::GitHubProvider;
use bleeding_edge_bot::registry::Registry;
use bleeding_edge_bot::state::RunStateStore;
use bleeding_edge_bot::vcs::GitCli;

/// Services wired from the configuration
pub struct CommandContext {
    /// Loaded configuration
    pub config: Config,
    /// Source repositories in merge order
    pub registry: Registry,
    /// GitHub API client
    pub provider: GitHubProvider,
    /// Git command runner
    pub vcs: GitCli,
    /// Previous-run snapshot store
    pub store: RunStateStore,
}

impl CommandContext {
    /// Wire up the services
    ///
    /// Fails if a repository URL is malformed or two repositories map to the
    /// same remote name.
    pub fn new(config: Config) -> Result<Self> {
        let registry = Registry::new(&config.pull_repos)?;

        let provider = GitHubProvider::new(
            &config.github.api_url,
            &config.github.user_agent,
            config.credentials(),
        )?;

        let mut vcs = GitCli::new(config.git_timeout()).with_program(config.git.program.clone());
        if let (Some(name), Some(email)) = (&config.git.author_name, &config.git.author_email) {
            vcs = vcs.with_identity(name, email);
        }

        let store = RunStateStore::new(config.state_path());

        Ok(Self {
            config,
            registry,
            provider,
            vcs,
            store,
        })
    }

    /// Orchestrator borrowing this context's services
    pub fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator::new(
            &self.registry,
            &self.provider,
            &self.vcs,
            &self.store,
            self.config.tracking_settings(),
            self.config.label.clone(),
        )
    }
}

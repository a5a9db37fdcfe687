//! Configuration file handling
//!
//! The bot is configured from a TOML file. Only the repositories are
//! required; everything else has a default.
//!
//! ```toml
//! label = "pr:bleeding-edge-merge"
//! main_repo = "https://github.com/citra-emu/citra"
//! pull_repos = [
//!     "https://github.com/citra-emu/citra-bleeding-edge",
//!     "https://github.com/citra-emu/citra",
//! ]
//! push_repo = "git@github.com:citra-emu/citra-bleeding-edge"
//!
//! [git]
//! timeout_secs = 600
//! ```

use crate::error::{Error, Result};
use crate::provider::ClientCredentials;
use crate::tracking::TrackingSettings;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `github.client_id`
pub const CLIENT_ID_ENV: &str = "GITHUB_CLIENT_ID";
/// Environment variable overriding `github.client_secret`
pub const CLIENT_SECRET_ENV: &str = "GITHUB_CLIENT_SECRET";

const CONFIG_DIR: &str = "bleeding-edge-bot";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Label marking PRs for the integration branch
    #[serde(default = "default_label")]
    pub label: String,
    /// Repository the tracking clone is cloned from
    pub main_repo: String,
    /// Repositories whose labeled PRs are merged, in merge order
    pub pull_repos: Vec<String>,
    /// Repository the integration branch is published to
    pub push_repo: String,
    /// Main branch of the main repository
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
    /// Branch rebuilt on every run
    #[serde(default = "default_integration_branch")]
    pub integration_branch: String,
    /// Name used in the merge log and its commit message
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    /// Directory relative paths are resolved against
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,
    /// Location of the tracking clone
    #[serde(default = "default_tracking_dir")]
    pub tracking_dir: PathBuf,
    /// Location of the run-state file
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    /// GitHub API settings
    #[serde(default)]
    pub github: GitHubConfig,
    /// Git invocation settings
    #[serde(default)]
    pub git: GitConfig,
    /// Log sinks
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub API settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitHubConfig {
    /// REST API root
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// `User-Agent` sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// OAuth client ID sent as a query parameter
    pub client_id: Option<String>,
    /// OAuth client secret sent as a query parameter
    pub client_secret: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            client_id: None,
            client_secret: None,
        }
    }
}

/// Git invocation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitConfig {
    /// Git executable
    #[serde(default = "default_git_program")]
    pub program: String,
    /// Per-invocation timeout in seconds
    #[serde(default = "default_git_timeout")]
    pub timeout_secs: u64,
    /// Author/committer name for merges and the merge log
    pub author_name: Option<String>,
    /// Author/committer email for merges and the merge log
    pub author_email: Option<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: default_git_program(),
            timeout_secs: default_git_timeout(),
            author_name: None,
            author_email: None,
        }
    }
}

/// Log sinks
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Console level (overridden by `RUST_LOG`)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// File receiving every message, debug and up
    pub debug_file: Option<PathBuf>,
    /// File receiving info and up
    pub error_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            debug_file: None,
            error_file: None,
        }
    }
}

fn default_label() -> String {
    "pr:bleeding-edge-merge".to_string()
}

fn default_base_branch() -> String {
    "master".to_string()
}

fn default_integration_branch() -> String {
    "bleeding_edge".to_string()
}

fn default_bot_name() -> String {
    "lemonbot".to_string()
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_tracking_dir() -> PathBuf {
    PathBuf::from("tracking_repo")
}

fn default_state_file() -> PathBuf {
    PathBuf::from("previous_run.toml")
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    concat!("bleeding-edge-bot/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_git_program() -> String {
    "git".to_string()
}

const fn default_git_timeout() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Default config file location (`<config dir>/bleeding-edge-bot/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}

impl Config {
    /// Load configuration from `path`, or from the default location
    ///
    /// Client credentials from the environment override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path().ok_or_else(|| {
                Error::Config("could not determine the config directory; pass --config".to_string())
            })?,
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

        let mut config = Self::from_toml_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse config: {e}")))
    }

    /// Override client credentials from environment-like lookups
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup(CLIENT_ID_ENV) {
            self.github.client_id = Some(id);
        }
        if let Some(secret) = lookup(CLIENT_SECRET_ENV) {
            self.github.client_secret = Some(secret);
        }
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.label.trim().is_empty() {
            return Err(Error::Config("label must not be empty".to_string()));
        }
        if self.pull_repos.is_empty() {
            return Err(Error::Config("pull_repos must list at least one repository".to_string()));
        }
        if self.base_branch == self.integration_branch {
            return Err(Error::Config(
                "integration_branch must differ from base_branch".to_string(),
            ));
        }
        if self.git.timeout_secs == 0 {
            return Err(Error::Config("git.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Resolve a configured path against `work_dir`
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }

    /// Full path of the run-state file
    pub fn state_path(&self) -> PathBuf {
        self.resolve(&self.state_file)
    }

    /// Settings for the tracking clone
    pub fn tracking_settings(&self) -> TrackingSettings {
        TrackingSettings {
            path: self.resolve(&self.tracking_dir),
            main_repo: self.main_repo.clone(),
            push_url: self.push_repo.clone(),
            base_branch: self.base_branch.clone(),
            integration_branch: self.integration_branch.clone(),
            bot_name: self.bot_name.clone(),
        }
    }

    /// Client credentials, if both halves are configured
    pub fn credentials(&self) -> Option<ClientCredentials> {
        match (&self.github.client_id, &self.github.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some(ClientCredentials {
                    client_id: id.clone(),
                    client_secret: secret.clone(),
                })
            }
            _ => None,
        }
    }

    /// Per-invocation git timeout
    pub const fn git_timeout(&self) -> Duration {
        Duration::from_secs(self.git.timeout_secs)
    }
}

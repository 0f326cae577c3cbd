//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.issue-stats.toml` files.

use crate::github::ClientConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = ".issue-stats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// GitHub API settings.
    #[serde(default)]
    pub github: GithubConfig,

    /// Progress display settings.
    #[serde(default)]
    pub progress: ProgressConfig,
}

/// GitHub API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Items requested per page (GitHub caps this at 100).
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Number of retries on rate limiting or server errors.
    #[serde(default = "default_retries")]
    pub retries: usize,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            per_page: default_per_page(),
            timeout_seconds: default_timeout(),
            retries: default_retries(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> usize {
    3
}

fn default_user_agent() -> String {
    format!("issue-stats/{}", env!("CARGO_PKG_VERSION"))
}

/// Progress display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Show a live counter while fetching.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Items between two debug log lines.
    #[serde(default = "default_interval")]
    pub interval: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: default_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    100
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.issue-stats.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref api_url) = args.api_url {
            self.github.api_url = api_url.clone();
        }
        if let Some(per_page) = args.per_page {
            self.github.per_page = per_page;
        }
        if let Some(timeout) = args.timeout {
            self.github.timeout_seconds = timeout;
        }

        if args.no_progress || args.quiet {
            self.progress.enabled = false;
        }
    }

    /// Build the GitHub client settings, adding the access token.
    pub fn client_config(&self, token: Option<String>) -> ClientConfig {
        ClientConfig {
            api_url: self.github.api_url.clone(),
            token,
            per_page: self.github.per_page,
            timeout_seconds: self.github.timeout_seconds,
            retries: self.github.retries,
            user_agent: self.github.user_agent.clone(),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

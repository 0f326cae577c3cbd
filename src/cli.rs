//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::github::RepoSlug;
use crate::models::IssueState;
use clap::Parser;
use std::path::PathBuf;

/// issue-stats - contribution statistics from a GitHub issue tracker
///
/// Counts issues, pull requests, comments and text volume per user and
/// prints a table sorted by decreasing number of contributions.
///
/// Examples:
///   issue-stats --repo tsduck/tsduck
///   issue-stats --repo owner/name --token ghp_xxx --state closed
///   GITHUB_TOKEN=ghp_xxx issue-stats -r owner/name --no-progress > stats.txt
///   issue-stats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// GitHub repository to analyze, as OWNER/NAME
    #[arg(
        short,
        long,
        value_name = "OWNER/NAME",
        env = "GITHUB_REPOSITORY",
        required_unless_present = "init_config"
    )]
    pub repo: Option<String>,

    /// GitHub access token
    ///
    /// Without a token, the API allows only 60 requests per hour.
    #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Which issues to include (all, open, closed)
    #[arg(long, default_value = "all", value_name = "STATE")]
    pub state: IssueState,

    /// GitHub REST API base URL
    ///
    /// Overrides the config file. Use for GitHub Enterprise servers.
    #[arg(long, value_name = "URL", env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Items per API page (1-100)
    #[arg(long, value_name = "COUNT")]
    pub per_page: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .issue-stats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors and the report only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not display progress counters
    #[arg(long)]
    pub no_progress: bool,

    /// Generate a default .issue-stats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The repository to analyze.
    pub fn repo_slug(&self) -> Result<RepoSlug, String> {
        self.repo
            .as_deref()
            .ok_or_else(|| "No repository given, use --repo OWNER/NAME".to_string())?
            .parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        self.repo_slug()?;

        if let Some(ref api_url) = self.api_url {
            if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(per_page) = self.per_page {
            if !(1..=100).contains(&per_page) {
                return Err("Items per page must be between 1 and 100".to_string());
            }
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Arguments as if only `--repo` had been given.
    #[cfg(test)]
    pub fn for_repo(repo: &str) -> Self {
        Args {
            repo: Some(repo.to_string()),
            token: None,
            state: IssueState::All,
            api_url: None,
            per_page: None,
            timeout: None,
            config: None,
            verbose: false,
            quiet: false,
            no_progress: false,
            init_config: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_line() {
        let args = Args::try_parse_from([
            "issue-stats",
            "--repo",
            "tsduck/tsduck",
            "--token",
            "abc",
            "--state",
            "closed",
            "--",
        ])
        .unwrap();
        assert_eq!(args.repo.as_deref(), Some("tsduck/tsduck"));
        assert_eq!(args.token.as_deref(), Some("abc"));
        assert_eq!(args.state, IssueState::Closed);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_init_config_needs_no_repo() {
        let args = Args::try_parse_from(["issue-stats", "--init-config"]).unwrap();
        assert!(args.init_config);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_repo() {
        let args = Args::for_repo("not-a-slug");
        assert!(args.validate().is_err());

        let mut args = Args::for_repo("owner/name");
        args.repo = None;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_ranges() {
        let mut args = Args::for_repo("owner/name");
        args.per_page = Some(101);
        assert!(args.validate().is_err());

        args.per_page = Some(100);
        args.timeout = Some(0);
        assert!(args.validate().is_err());

        args.timeout = Some(30);
        args.api_url = Some("ftp://example.com".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = Args::for_repo("owner/name");
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = Args::for_repo("owner/name");
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}

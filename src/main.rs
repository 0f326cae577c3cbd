//! issue-stats - contribution statistics from a GitHub issue tracker
//!
//! Walks all issues, pull requests and issue comments of a repository and
//! prints, per user, how many of each they wrote and how many characters
//! their texts contain. Users are sorted by decreasing contributions.
//!
//! The report goes to stdout; logs and progress counters go to stderr.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, network, authentication, rate limit)

mod analysis;
mod cli;
mod config;
mod github;
mod models;
mod progress;
mod report;

use analysis::Aggregator;
use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use github::{GithubClient, GithubError};
use progress::ProgressReporter;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("issue-stats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Repository: {:?}, state: {}", args.repo, args.state);

    if let Err(e) = run(args).await {
        error!("Run failed: {:#}", e);
        if e
            .downcast_ref::<GithubError>()
            .is_some_and(GithubError::is_rate_limited)
        {
            eprintln!("Hint: set GITHUB_TOKEN or pass --token to raise the API rate limit.");
        }
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default configuration file.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("{} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    eprintln!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging on stderr so stdout only carries the report.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Fetch both feeds, then print the table.
async fn run(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let repo = args.repo_slug().map_err(anyhow::Error::msg)?;
    let client = GithubClient::new(config.client_config(args.token.clone()), repo.clone())?;

    let mut aggregator = Aggregator::new();

    info!("Fetching {} issues of {}", args.state, repo);
    let mut issue_progress = ProgressReporter::new("issues", &config.progress);
    aggregator
        .ingest_issues(&mut client.issues(args.state), &mut issue_progress)
        .await
        .context("Failed to list issues")?;

    info!("Fetching issue comments of {}", repo);
    let mut comment_progress = ProgressReporter::new("comments", &config.progress);
    aggregator
        .ingest_comments(&mut client.issue_comments(), &mut comment_progress)
        .await
        .context("Failed to list issue comments")?;

    info!(
        "Collected {} users from {} issues and {} comments in {:.1}s",
        aggregator.user_count(),
        issue_progress.count(),
        comment_progress.count(),
        start_time.elapsed().as_secs_f64()
    );

    let stdout = std::io::stdout();
    report::write_text_report(&aggregator, &mut stdout.lock())
        .context("Failed to write report")?;

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

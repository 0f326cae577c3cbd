//! REST client for the GitHub issue tracker.
//!
//! Lists issues and issue comments of one repository, following `Link`
//! pagination and retrying transient failures.

use crate::github::error::GithubError;
use crate::github::{next_link, PageSource, RepoSlug};
use crate::models::{Comment, Issue, IssueState};
use indicatif::ProgressBar;
use reqwest::header::{HeaderMap, ACCEPT, LINK, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Settings for the GitHub client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub token: Option<String>,
    pub per_page: u32,
    pub timeout_seconds: u64,
    pub retries: usize,
    pub user_agent: String,
}

/// Client bound to a single repository.
pub struct GithubClient {
    config: ClientConfig,
    repo: RepoSlug,
    http: reqwest::Client,
}

impl GithubClient {
    /// Create a client for `repo`.
    pub fn new(config: ClientConfig, repo: RepoSlug) -> Result<Self, GithubError> {
        info!("Using GitHub API at {} for {}", config.api_url, repo);

        if config.token.is_none() {
            warn!("No GitHub token given, unauthenticated requests are limited to 60 per hour");
        }

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(GithubError::Client)?;

        Ok(Self { config, repo, http })
    }

    /// All issues of the repository in the given state, pull requests included.
    pub fn issues(&self, state: IssueState) -> Pager<'_, Issue> {
        let url = format!(
            "{}?state={}&per_page={}",
            self.repo_url("issues"),
            state.as_query(),
            self.config.per_page
        );
        Pager::new(self, url)
    }

    /// All issue comments of the repository, across every issue.
    pub fn issue_comments(&self) -> Pager<'_, Comment> {
        let url = format!(
            "{}?per_page={}",
            self.repo_url("issues/comments"),
            self.config.per_page
        );
        Pager::new(self, url)
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.config.api_url.trim_end_matches('/'),
            self.repo.owner,
            self.repo.name,
            path
        )
    }

    /// Fetch one page and the URL of the next one.
    async fn fetch_page<T: DeserializeOwned>(
        &self,
        url: &str,
        bar: &ProgressBar,
    ) -> Result<(Vec<T>, Option<String>), GithubError> {
        let response = self.send_with_retry(url, bar).await?;

        let next = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_link);

        let body = response
            .text()
            .await
            .map_err(|e| GithubError::from_transport(url, e))?;

        let items: Vec<T> = serde_json::from_str(&body).map_err(|source| GithubError::Decode {
            url: url.to_string(),
            source,
        })?;

        Ok((items, next))
    }

    /// GET with retries on 429 and 5xx responses.
    ///
    /// Retry warnings are printed above `bar` instead of through it.
    async fn send_with_retry(
        &self,
        url: &str,
        bar: &ProgressBar,
    ) -> Result<reqwest::Response, GithubError> {
        let mut attempt = 0usize;

        loop {
            attempt += 1;

            let mut request = self
                .http
                .get(url)
                .header(ACCEPT, "application/vnd.github+json");
            if let Some(ref token) = self.config.token {
                request = request.bearer_auth(token);
            }

            let response = request
                .send()
                .await
                .map_err(|e| GithubError::from_transport(url, e))?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            let headers = response.headers().clone();
            if attempt <= self.config.retries {
                if let Some(wait) = retry_delay(status, &headers, attempt) {
                    bar.suspend(|| {
                        warn!(
                            "GitHub returned {}, retrying in {:.1}s (attempt {}/{})",
                            status.as_u16(),
                            wait.as_secs_f64(),
                            attempt,
                            self.config.retries
                        )
                    });
                    sleep(wait).await;
                    continue;
                }
            }

            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::from_response(url, status, &headers, &body));
        }
    }
}

/// How long to wait before retrying, or `None` if the status is not retryable.
///
/// A 403 with an exhausted quota is not retried: the window lasts up to an hour.
fn retry_delay(status: StatusCode, headers: &HeaderMap, attempt: usize) -> Option<Duration> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let secs = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(2);
        return Some(Duration::from_secs(secs));
    }

    if status.is_server_error() {
        let shift = attempt.saturating_sub(1).min(10) as u32;
        return Some(Duration::from_millis(250u64 << shift));
    }

    None
}

/// Paginated feed of items from one listing endpoint.
pub struct Pager<'a, T> {
    client: &'a GithubClient,
    next_url: Option<String>,
    pages: usize,
    bar: ProgressBar,
    _item: PhantomData<T>,
}

impl<'a, T> Pager<'a, T> {
    fn new(client: &'a GithubClient, url: String) -> Self {
        Self {
            client,
            next_url: Some(url),
            pages: 0,
            bar: ProgressBar::hidden(),
            _item: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> PageSource<T> for Pager<'_, T> {
    async fn next_page(&mut self) -> Result<Option<Vec<T>>, GithubError> {
        let Some(url) = self.next_url.take() else {
            return Ok(None);
        };

        let (items, next) = self.client.fetch_page::<T>(&url, &self.bar).await?;
        self.pages += 1;
        let (pages, count) = (self.pages, items.len());
        self.bar
            .suspend(|| debug!("Fetched page {} ({} items) from {}", pages, count, url));

        self.next_url = next;
        Ok(Some(items))
    }

    fn attach_progress(&mut self, bar: &ProgressBar) {
        self.bar = bar.clone();
    }
}

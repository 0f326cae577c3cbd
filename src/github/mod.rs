//! GitHub issue tracker access.
//!
//! This module provides the paginated feeds of issues and comments that
//! the aggregator consumes, along with repository slug parsing.

pub mod client;
pub mod error;

pub use client::{ClientConfig, GithubClient};
pub use error::GithubError;

use indicatif::ProgressBar;
use std::fmt;
use std::str::FromStr;

/// A source of items delivered one page at a time.
///
/// Each call may perform network I/O. `Ok(None)` marks the end of the feed.
#[allow(async_fn_in_trait)] // Only used with concrete types, never as dyn
pub trait PageSource<T> {
    async fn next_page(&mut self) -> Result<Option<Vec<T>>, GithubError>;

    /// Print log lines above `bar` while it is drawn.
    fn attach_progress(&mut self, _bar: &ProgressBar) {}
}

/// An `owner/name` repository identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| format!("Repository must be in OWNER/NAME form: '{}'", s))?;

        let valid = |part: &str| {
            !part.is_empty()
                && part
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };

        if !valid(owner) || !valid(name) {
            return Err(format!("Invalid repository name: '{}'", s));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Extract the `rel="next"` target from a `Link` response header.
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        if !parts.any(|p| p.trim() == r#"rel="next""#) {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(String::from)
    })
}

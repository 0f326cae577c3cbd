//! Data models for the contribution statistics.
//!
//! This module contains the items deserialized from the GitHub issue
//! tracker and the per-user tally records built from them.

use serde::Deserialize;
use std::fmt;

/// Login GitHub substitutes for accounts that no longer exist.
pub const GHOST_LOGIN: &str = "ghost";

/// Issue state filter used when listing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum IssueState {
    /// Open and closed issues (default)
    #[default]
    All,
    /// Open issues only
    Open,
    /// Closed issues only
    Closed,
}

impl IssueState {
    /// Returns the value expected by the `state` query parameter.
    pub fn as_query(&self) -> &'static str {
        match self {
            IssueState::All => "all",
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// The author of an issue or comment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Author {
    pub login: String,
}

/// An issue as returned by the issues listing endpoint.
///
/// Pull requests are listed as issues carrying a `pull_request` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub number: u64,
    #[serde(default)]
    pub user: Option<Author>,
    /// Present only when the issue is a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Issue {
    /// Login of the author, `ghost` when the account is gone.
    pub fn author_login(&self) -> &str {
        self.user.as_ref().map_or(GHOST_LOGIN, |u| u.login.as_str())
    }

    /// Whether this issue is a pull request.
    pub fn is_pull_request(&self) -> bool {
        // Some API versions serialize the marker as an explicit null.
        matches!(self.pull_request, Some(ref v) if !v.is_null())
    }
}

/// An issue comment as returned by the repository-wide comments endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub user: Option<Author>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Comment {
    /// Login of the author, `ghost` when the account is gone.
    pub fn author_login(&self) -> &str {
        self.user.as_ref().map_or(GHOST_LOGIN, |u| u.login.as_str())
    }
}

/// Contribution counters for one user, or for all users together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTally {
    /// User login, or the label of the grand-total row.
    pub name: String,
    /// Number of plain issues opened.
    pub issues: u64,
    /// Number of pull requests opened.
    pub prs: u64,
    /// Number of issue comments written.
    pub comments: u64,
    /// Characters across all issue and comment bodies.
    pub characters: u64,
}

impl UserTally {
    /// Creates an empty tally.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Total number of contributions.
    pub fn total(&self) -> u64 {
        self.issues + self.prs + self.comments
    }
}

/// Character length of an optional body, counted in Unicode scalar values.
pub fn body_length(body: Option<&str>) -> Option<u64> {
    body.map(|b| b.chars().count() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_pull_request_marker() {
        let issue: Issue = serde_json::from_str(
            r#"{"number": 1, "user": {"login": "alice"}, "body": "text"}"#,
        )
        .unwrap();
        assert!(!issue.is_pull_request());

        let pr: Issue = serde_json::from_str(
            r#"{"number": 2, "user": {"login": "bob"}, "pull_request": {"url": "https://x"}, "body": null}"#,
        )
        .unwrap();
        assert!(pr.is_pull_request());
        assert!(pr.body.is_none());

        let explicit_null: Issue =
            serde_json::from_str(r#"{"number": 3, "pull_request": null}"#).unwrap();
        assert!(!explicit_null.is_pull_request());
    }

    #[test]
    fn test_missing_user_is_ghost() {
        let comment: Comment = serde_json::from_str(r#"{"id": 7, "user": null}"#).unwrap();
        assert_eq!(comment.author_login(), GHOST_LOGIN);

        let issue = Issue::default();
        assert_eq!(issue.author_login(), GHOST_LOGIN);
    }

    #[test]
    fn test_user_tally_total() {
        let tally = UserTally {
            name: "alice".to_string(),
            issues: 2,
            prs: 3,
            comments: 4,
            characters: 100,
        };
        assert_eq!(tally.total(), 9);
        assert_eq!(UserTally::new("bob").total(), 0);
    }

    #[test]
    fn test_body_length_counts_chars() {
        assert_eq!(body_length(None), None);
        assert_eq!(body_length(Some("")), Some(0));
        assert_eq!(body_length(Some("héllo")), Some(5));
    }

    #[test]
    fn test_issue_state_query() {
        assert_eq!(IssueState::default(), IssueState::All);
        assert_eq!(IssueState::Closed.as_query(), "closed");
        assert_eq!(IssueState::Open.to_string(), "open");
    }
}

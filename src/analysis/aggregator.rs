//! Per-user contribution aggregation.
//!
//! This module tallies issues, pull requests and comments per author while
//! keeping a grand total across all users.

use crate::github::{GithubError, PageSource};
use crate::models::{body_length, Comment, Issue, UserTally};
use crate::progress::ProgressReporter;
use std::collections::HashMap;

/// Accumulates contribution counters over the issue and comment feeds.
#[derive(Debug, Default)]
pub struct Aggregator {
    users: HashMap<String, UserTally>,
    grand_total: UserTally,
}

impl Aggregator {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one issue or pull request for its author.
    pub fn record_issue(&mut self, issue: &Issue) {
        let user = Self::tally_for(&mut self.users, issue.author_login());

        if issue.is_pull_request() {
            user.prs += 1;
            self.grand_total.prs += 1;
        } else {
            user.issues += 1;
            self.grand_total.issues += 1;
        }

        if let Some(size) = body_length(issue.body.as_deref()) {
            user.characters += size;
            self.grand_total.characters += size;
        }
    }

    /// Count one comment for its author.
    pub fn record_comment(&mut self, comment: &Comment) {
        let user = Self::tally_for(&mut self.users, comment.author_login());

        user.comments += 1;
        self.grand_total.comments += 1;

        if let Some(size) = body_length(comment.body.as_deref()) {
            user.characters += size;
            self.grand_total.characters += size;
        }
    }

    /// Consume the whole issue feed.
    ///
    /// Feed errors are returned as-is; counters keep what was recorded so far.
    pub async fn ingest_issues<S>(
        &mut self,
        source: &mut S,
        progress: &mut ProgressReporter,
    ) -> Result<(), GithubError>
    where
        S: PageSource<Issue>,
    {
        source.attach_progress(progress.bar());
        while let Some(page) = source.next_page().await? {
            for issue in &page {
                progress.tick();
                self.record_issue(issue);
            }
        }
        progress.finish();
        Ok(())
    }

    /// Consume the whole comment feed.
    pub async fn ingest_comments<S>(
        &mut self,
        source: &mut S,
        progress: &mut ProgressReporter,
    ) -> Result<(), GithubError>
    where
        S: PageSource<Comment>,
    {
        source.attach_progress(progress.bar());
        while let Some(page) = source.next_page().await? {
            for comment in &page {
                progress.tick();
                self.record_comment(comment);
            }
        }
        progress.finish();
        Ok(())
    }

    fn tally_for<'a>(users: &'a mut HashMap<String, UserTally>, login: &str) -> &'a mut UserTally {
        users
            .entry(login.to_string())
            .or_insert_with(|| UserTally::new(login))
    }

    /// Number of distinct users seen.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Counters summed over all users.
    pub fn grand_total(&self) -> &UserTally {
        &self.grand_total
    }

    /// Tally of one user, if seen.
    #[cfg(test)]
    pub fn user(&self, login: &str) -> Option<&UserTally> {
        self.users.get(login)
    }

    /// Users by decreasing total contributions, ties by name.
    pub fn ranked_users(&self) -> Vec<&UserTally> {
        let mut users: Vec<&UserTally> = self.users.values().collect();
        users.sort_by(|a, b| {
            b.total()
                .cmp(&a.total())
                .then_with(|| a.name.cmp(&b.name))
        });
        users
    }
}

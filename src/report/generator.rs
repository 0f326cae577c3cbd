//! Plain-text contribution table.
//!
//! Renders the header, the grand-total row and one row per user sorted by
//! decreasing number of contributions.

use crate::analysis::Aggregator;
use crate::models::UserTally;
use std::io::Write;

/// Column titles, in display order.
const COLUMNS: [&str; 6] = ["User name", "Issues", "PR", "Comments", "Total", "Size"];

/// Generate the complete report text, one line per row.
pub fn generate_text_report(aggregator: &Aggregator) -> String {
    let mut output = String::new();

    output.push_str(&header_line());
    output.push('\n');

    let total = UserTally {
        name: total_label(aggregator.user_count()),
        ..aggregator.grand_total().clone()
    };
    output.push_str(&tally_line(&total));
    output.push('\n');

    for user in aggregator.ranked_users() {
        output.push_str(&tally_line(user));
        output.push('\n');
    }

    output
}

/// Write the report to `out`.
pub fn write_text_report(aggregator: &Aggregator, out: &mut impl Write) -> std::io::Result<()> {
    out.write_all(generate_text_report(aggregator).as_bytes())?;
    out.flush()
}

/// Label of the grand-total row.
pub fn total_label(user_count: usize) -> String {
    format!("Total ({} users)", user_count)
}

fn header_line() -> String {
    let [name, issues, prs, comments, total, size] = COLUMNS;
    format!(
        "{:<20} {:>8} {:>8} {:>8} {:>8} {:>8}",
        name, issues, prs, comments, total, size
    )
}

/// Names wider than the first column push the other columns right.
fn tally_line(tally: &UserTally) -> String {
    format!(
        "{:<20} {:>8} {:>8} {:>8} {:>8} {:>8}",
        tally.name,
        tally.issues,
        tally.prs,
        tally.comments,
        tally.total(),
        tally.characters
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, Comment, Issue};

    fn sample_aggregator() -> Aggregator {
        let author = |login: &str| {
            Some(Author {
                login: login.to_string(),
            })
        };

        let mut agg = Aggregator::new();
        agg.record_issue(&Issue {
            number: 1,
            user: author("alice"),
            pull_request: None,
            body: Some("0123456789".to_string()),
        });
        agg.record_issue(&Issue {
            number: 2,
            user: author("bob"),
            pull_request: Some(serde_json::json!({})),
            body: Some(String::new()),
        });
        agg.record_comment(&Comment {
            id: 3,
            user: author("alice"),
            body: Some("hello".to_string()),
        });
        agg
    }

    #[test]
    fn test_generate_text_report() {
        let report = generate_text_report(&sample_aggregator());
        let lines: Vec<_> = report.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "User name              Issues       PR Comments    Total     Size"
        );
        assert_eq!(
            lines[1],
            "Total (2 users)             1        1        1        3       15"
        );
        assert_eq!(
            lines[2],
            "alice                       1        0        1        2       15"
        );
        assert_eq!(
            lines[3],
            "bob                         0        1        0        1        0"
        );
    }

    #[test]
    fn test_rows_in_decreasing_total_order() {
        let report = generate_text_report(&sample_aggregator());
        let totals: Vec<u64> = report
            .lines()
            .skip(2)
            .map(|line| line.split_whitespace().nth(4).unwrap().parse().unwrap())
            .collect();
        assert!(totals.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_long_names_are_not_truncated() {
        let tally = UserTally {
            name: "a-very-long-github-login-name".to_string(),
            issues: 1234567,
            ..UserTally::default()
        };
        let line = tally_line(&tally);
        assert!(line.starts_with("a-very-long-github-login-name  1234567"));
    }

    #[test]
    fn test_empty_report() {
        let report = generate_text_report(&Aggregator::new());
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Total (0 users)"));
    }

    #[test]
    fn test_write_text_report() {
        let mut buffer = Vec::new();
        write_text_report(&sample_aggregator(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.ends_with("0\n"));
        assert!(text.contains("Total (2 users)"));
    }
}

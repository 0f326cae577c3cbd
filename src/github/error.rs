//! Errors reported by the GitHub client.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

const RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
const RATELIMIT_RESET: &str = "x-ratelimit-reset";

/// Failure while talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Cannot reach GitHub API at {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GitHub API rate limit exceeded{}", reset_hint(.reset))]
    RateLimited { reset: Option<DateTime<Utc>> },

    #[error("GitHub rejected the credentials: {message}")]
    Unauthorized { message: String },

    #[error("Repository not found or not accessible: {url}")]
    NotFound { url: String },

    #[error("GitHub API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode GitHub response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

fn reset_hint(reset: &Option<DateTime<Utc>>) -> String {
    match reset {
        Some(at) => format!(" (resets at {})", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => String::new(),
    }
}

impl GithubError {
    /// Wrap a transport error from reqwest.
    pub fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GithubError::Timeout {
                url: url.to_string(),
            }
        } else {
            GithubError::Network {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// Classify a non-success response.
    pub fn from_response(url: &str, status: StatusCode, headers: &HeaderMap, body: &str) -> Self {
        let message = error_message(body);

        match status {
            StatusCode::UNAUTHORIZED => GithubError::Unauthorized { message },
            StatusCode::NOT_FOUND => GithubError::NotFound {
                url: url.to_string(),
            },
            StatusCode::TOO_MANY_REQUESTS => GithubError::RateLimited {
                reset: rate_limit_reset(headers),
            },
            // Secondary limits keep quota left but send Retry-After.
            StatusCode::FORBIDDEN
                if rate_limit_exhausted(headers) || headers.contains_key(RETRY_AFTER) =>
            {
                GithubError::RateLimited {
                    reset: rate_limit_reset(headers),
                }
            }
            _ => GithubError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether the failure is due to rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GithubError::RateLimited { .. })
    }
}

/// Whether the response headers report an exhausted quota.
pub fn rate_limit_exhausted(headers: &HeaderMap) -> bool {
    headers
        .get(RATELIMIT_REMAINING)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        == Some(0)
}

/// Time at which the rate-limit quota resets, if reported.
pub fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    headers
        .get(RATELIMIT_RESET)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// GitHub error bodies carry a `message` field; fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_unauthorized_message() {
        let err = GithubError::from_response(
            "https://api.github.com/repos/a/b/issues",
            StatusCode::UNAUTHORIZED,
            &HeaderMap::new(),
            r#"{"message": "Bad credentials", "documentation_url": "https://docs.github.com"}"#,
        );
        assert!(matches!(err, GithubError::Unauthorized { ref message } if message == "Bad credentials"));
    }

    #[test]
    fn test_forbidden_with_exhausted_quota_is_rate_limit() {
        let mut headers = HeaderMap::new();
        headers.insert(RATELIMIT_REMAINING, HeaderValue::from_static("0"));
        headers.insert(RATELIMIT_RESET, HeaderValue::from_static("1700000000"));

        let err = GithubError::from_response("u", StatusCode::FORBIDDEN, &headers, "");
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("resets at 2023-11-14"));
    }

    #[test]
    fn test_forbidden_secondary_limit_is_rate_limit() {
        let mut headers = HeaderMap::new();
        headers.insert(RATELIMIT_REMAINING, HeaderValue::from_static("4321"));
        headers.insert(RETRY_AFTER, HeaderValue::from_static("60"));

        let err = GithubError::from_response(
            "u",
            StatusCode::FORBIDDEN,
            &headers,
            r#"{"message": "You have exceeded a secondary rate limit."}"#,
        );
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_forbidden_without_quota_info_is_api_error() {
        let err = GithubError::from_response(
            "u",
            StatusCode::FORBIDDEN,
            &HeaderMap::new(),
            r#"{"message": "Resource not accessible"}"#,
        );
        match err {
            GithubError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "Resource not accessible");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_not_found_and_plain_text_body() {
        let err = GithubError::from_response("u", StatusCode::NOT_FOUND, &HeaderMap::new(), "");
        assert!(matches!(err, GithubError::NotFound { .. }));

        let err = GithubError::from_response(
            "u",
            StatusCode::BAD_GATEWAY,
            &HeaderMap::new(),
            "upstream unavailable\n",
        );
        assert_eq!(err.to_string(), "GitHub API error 502: upstream unavailable");
    }

    #[test]
    fn test_rate_limit_without_reset() {
        let err = GithubError::RateLimited { reset: None };
        assert_eq!(err.to_string(), "GitHub API rate limit exceeded");
    }
}

//! Classification of non-success HTTP statuses into user-facing errors.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;

/// A request that reached the server but did not succeed.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusError {
    /// Rate limit exceeded (HTTP 403 with exhausted quota, or 429)
    RateLimitExceeded(String),
    /// Authentication failed (HTTP 401)
    AuthenticationFailed(String),
    /// Resource not found (HTTP 404)
    NotFound(String),
    /// Forbidden access (HTTP 403 non-rate-limit)
    Forbidden(String),
    /// Any other non-success status
    Other { url: String, status: u16 },
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusError::RateLimitExceeded(url) => {
                write!(
                    f,
                    "Rate limit exceeded for {}. Try again later or set GITHUB_TOKEN environment variable.",
                    url
                )
            }
            StatusError::AuthenticationFailed(url) => {
                write!(f, "Authentication failed for {}. Check your GITHUB_TOKEN.", url)
            }
            StatusError::NotFound(url) => write!(f, "Not found: {}", url),
            StatusError::Forbidden(url) => {
                write!(f, "Access forbidden: {}. You may need authentication.", url)
            }
            StatusError::Other { url, status } => write!(f, "HTTP {} from {}", status, url),
        }
    }
}

impl std::error::Error for StatusError {}

/// Classifies a non-success status.
///
/// GitHub signals an exhausted quota with `403` and `x-ratelimit-remaining: 0`.
pub fn classify_status(status: StatusCode, headers: &HeaderMap, url: &str) -> StatusError {
    let quota_exhausted = headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "0");

    match status {
        StatusCode::UNAUTHORIZED => StatusError::AuthenticationFailed(url.to_string()),
        StatusCode::FORBIDDEN if quota_exhausted => StatusError::RateLimitExceeded(url.to_string()),
        StatusCode::FORBIDDEN => StatusError::Forbidden(url.to_string()),
        StatusCode::TOO_MANY_REQUESTS => StatusError::RateLimitExceeded(url.to_string()),
        StatusCode::NOT_FOUND => StatusError::NotFound(url.to_string()),
        s => StatusError::Other {
            url: url.to_string(),
            status: s.as_u16(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    const URL: &str = "https://api.github.com/repos/o/r/releases/latest";

    #[test]
    fn test_classify_not_found() {
        let err = classify_status(StatusCode::NOT_FOUND, &HeaderMap::new(), URL);
        assert_eq!(err, StatusError::NotFound(URL.to_string()));
        assert!(err.to_string().contains("Not found"));
    }

    #[test]
    fn test_classify_forbidden_vs_rate_limit() {
        let err = classify_status(StatusCode::FORBIDDEN, &HeaderMap::new(), URL);
        assert!(matches!(err, StatusError::Forbidden(_)));

        let mut headers = HeaderMap::new();
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        let err = classify_status(StatusCode::FORBIDDEN, &headers, URL);
        assert!(matches!(err, StatusError::RateLimitExceeded(_)));
        assert!(err.to_string().contains("GITHUB_TOKEN"));
    }

    #[test]
    fn test_classify_too_many_requests() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, &HeaderMap::new(), URL);
        assert!(matches!(err, StatusError::RateLimitExceeded(_)));
    }

    #[test]
    fn test_classify_unauthorized() {
        let err = classify_status(StatusCode::UNAUTHORIZED, &HeaderMap::new(), URL);
        assert!(err.to_string().contains("Authentication"));
    }

    #[test]
    fn test_classify_server_error() {
        let err = classify_status(StatusCode::BAD_GATEWAY, &HeaderMap::new(), URL);
        assert_eq!(
            err,
            StatusError::Other {
                url: URL.to_string(),
                status: 502
            }
        );
        assert!(err.to_string().starts_with("HTTP 502"));
    }
}

//! Upstream error type for Azure Resource Manager calls.
//!
//! Every failure talking to the provider becomes an [`UpstreamError`]. Clients of
//! the HTTP backend never see the difference between variants (they all collapse
//! into one fixed 500 body), but the server logs carry the classification from
//! [`UpstreamError::kind`] so an operator can tell an expired token from a
//! throttled tenant.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The request never produced a response (DNS, connect, TLS, reset)
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The provider answered with a non-2xx status
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },
    /// The response body was not the JSON we expected
    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification used for log output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    Unauthorized,
    NotFound,
    Throttled,
    Unavailable,
    Network,
    Malformed,
    Other,
}

impl UpstreamErrorKind {
    /// Short label for compact display
    pub fn short_label(&self) -> &'static str {
        match self {
            UpstreamErrorKind::Unauthorized => "unauthorized",
            UpstreamErrorKind::NotFound => "not-found",
            UpstreamErrorKind::Throttled => "throttled",
            UpstreamErrorKind::Unavailable => "unavailable",
            UpstreamErrorKind::Network => "network",
            UpstreamErrorKind::Malformed => "malformed",
            UpstreamErrorKind::Other => "error",
        }
    }
}

impl UpstreamError {
    pub fn status(url: impl Into<String>, status: StatusCode, body: impl Into<String>) -> Self {
        UpstreamError::Status {
            url: url.into(),
            status,
            body: truncate_body(&body.into(), 500),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            UpstreamError::Transport { url, .. }
            | UpstreamError::Status { url, .. }
            | UpstreamError::Decode { url, .. } => url,
        }
    }

    pub fn kind(&self) -> UpstreamErrorKind {
        match self {
            UpstreamError::Transport { .. } => UpstreamErrorKind::Network,
            UpstreamError::Decode { .. } => UpstreamErrorKind::Malformed,
            UpstreamError::Status { status, body, .. } => categorize_status(*status, body),
        }
    }
}

/// Classify a non-2xx response from its status and, where the status is
/// ambiguous, the ARM error code in the body.
pub fn categorize_status(status: StatusCode, body: &str) -> UpstreamErrorKind {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => UpstreamErrorKind::Unauthorized,
        StatusCode::NOT_FOUND => UpstreamErrorKind::NotFound,
        StatusCode::TOO_MANY_REQUESTS => UpstreamErrorKind::Throttled,
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => UpstreamErrorKind::Unavailable,
        _ => match extract_error_code(body).as_deref() {
            Some("ExpiredAuthenticationToken")
            | Some("InvalidAuthenticationToken")
            | Some("AuthorizationFailed") => UpstreamErrorKind::Unauthorized,
            Some("SubscriptionNotFound") | Some("ResourceGroupNotFound")
            | Some("ResourceNotFound") => UpstreamErrorKind::NotFound,
            _ => UpstreamErrorKind::Other,
        },
    }
}

/// Pull `error.code` out of an ARM error body: `{"error":{"code":"...","message":"..."}}`
pub fn extract_error_code(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|c| c.as_str())
        .map(str::to_string)
}

/// Truncate a body to max length on a char boundary, adding ellipsis if truncated
fn truncate_body(body: &str, max_len: usize) -> String {
    if body.len() <= max_len {
        return body.to_string();
    }
    let mut end = max_len.saturating_sub(3);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_unauthorized() {
        let kind = categorize_status(StatusCode::UNAUTHORIZED, "");
        assert_eq!(kind, UpstreamErrorKind::Unauthorized);
    }

    #[test]
    fn test_categorize_throttled() {
        let kind = categorize_status(StatusCode::TOO_MANY_REQUESTS, "");
        assert_eq!(kind, UpstreamErrorKind::Throttled);
        assert_eq!(kind.short_label(), "throttled");
    }

    #[test]
    fn test_categorize_from_body_code() {
        let body = r#"{"error":{"code":"ExpiredAuthenticationToken","message":"expired"}}"#;
        assert_eq!(
            categorize_status(StatusCode::BAD_REQUEST, body),
            UpstreamErrorKind::Unauthorized
        );

        let body = r#"{"error":{"code":"ResourceGroupNotFound","message":"gone"}}"#;
        assert_eq!(
            categorize_status(StatusCode::CONFLICT, body),
            UpstreamErrorKind::NotFound
        );
    }

    #[test]
    fn test_categorize_unknown() {
        assert_eq!(
            categorize_status(StatusCode::BAD_REQUEST, "not json"),
            UpstreamErrorKind::Other
        );
    }

    #[test]
    fn test_extract_error_code() {
        assert_eq!(
            extract_error_code(r#"{"error":{"code":"InvalidApiVersionParameter"}}"#),
            Some("InvalidApiVersionParameter".to_string())
        );
        assert_eq!(extract_error_code("{}"), None);
    }

    #[test]
    fn test_status_error_truncates_body() {
        let body = "x".repeat(2000);
        let err = UpstreamError::status("https://example/x", StatusCode::BAD_REQUEST, body);
        match err {
            UpstreamError::Status { body, .. } => {
                assert_eq!(body.len(), 500);
                assert!(body.ends_with("..."));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_error_kind() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = UpstreamError::Decode {
            url: "https://example/x".to_string(),
            source,
        };
        assert_eq!(err.kind(), UpstreamErrorKind::Malformed);
        assert_eq!(err.url(), "https://example/x");
    }
}

//! Standardized API response types (RFC 7807 compliant for errors).

use serde::{Deserialize, Serialize};

/// RFC 7807 Problem Details for HTTP APIs.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub error_type: String,

    /// A short, human-readable summary of the problem type.
    pub title: String,

    /// The HTTP status code.
    pub status: u16,

    /// A human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Request ID for debugging purposes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: title.into(),
            status,
            detail: None,
            request_id: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    // Common error constructors
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(400, "Bad Request").with_detail(detail)
    }

    pub fn unauthorized() -> Self {
        Self::new(401, "Unauthorized")
    }

    pub fn internal_error() -> Self {
        Self::new(500, "Internal Server Error")
            .with_detail("An unexpected error occurred. Please try again later.")
    }
}

/// Body of a 429 response: problem details plus backoff fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitErrorResponse {
    #[serde(flatten)]
    pub problem: ErrorResponse,

    /// `ERR_RATE_LIMIT_EXCEEDED` or `ERR_QUOTA_EXCEEDED`.
    pub code: String,

    /// Seconds until the exhausted window resets.
    pub retry_after: u64,

    pub limit: u64,

    pub current: u64,
}

impl RateLimitErrorResponse {
    pub fn new(message: impl Into<String>, code: impl Into<String>, retry_after: u64, limit: u64, current: u64) -> Self {
        Self {
            problem: ErrorResponse::new(429, "Rate limit exceeded").with_detail(message),
            code: code.into(),
            retry_after,
            limit,
            current,
        }
    }
}

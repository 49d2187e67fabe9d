use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable reason for a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "ERR_RATE_LIMIT_EXCEEDED")]
    RateLimitExceeded,
    #[serde(rename = "ERR_QUOTA_EXCEEDED")]
    QuotaExceeded,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::RateLimitExceeded => "ERR_RATE_LIMIT_EXCEEDED",
            ErrorCode::QuotaExceeded => "ERR_QUOTA_EXCEEDED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backoff information attached to every denial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub error_code: ErrorCode,
    /// Seconds until the exhausted window resets. Always at least 1.
    pub retry_after: u64,
    pub limit: u64,
    pub current: u64,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied { message: String, detail: ErrorDetail },
}

impl Decision {
    pub fn denied(message: impl Into<String>, detail: ErrorDetail) -> Self {
        Decision::Denied {
            message: message.into(),
            detail,
        }
    }

    pub fn allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Decision::Allowed => None,
            Decision::Denied { message, .. } => Some(message),
        }
    }

    pub fn error_detail(&self) -> Option<&ErrorDetail> {
        match self {
            Decision::Allowed => None,
            Decision::Denied { detail, .. } => Some(detail),
        }
    }
}

/// Current counter values for one identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub requests_this_minute: u64,
    pub sequences_today: u64,
}

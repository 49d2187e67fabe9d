//! Error handling - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use disorder_core::domain::ErrorDetail;
use disorder_shared::{ErrorResponse, RateLimitErrorResponse};
use std::fmt;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    InvalidApiKey,
    RateLimited {
        message: String,
        detail: ErrorDetail,
        request_id: Option<String>,
    },
    Internal(String),
    Validation(Vec<String>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InvalidApiKey => write!(f, "Invalid API key"),
            AppError::RateLimited { message, .. } => write!(f, "{}", message),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::RateLimited {
                message,
                detail,
                request_id,
            } => {
                let mut body = RateLimitErrorResponse::new(
                    message.clone(),
                    detail.error_code.as_str(),
                    detail.retry_after,
                    detail.limit,
                    detail.current,
                );
                if let Some(id) = request_id {
                    body.problem = body.problem.with_request_id(id.clone());
                }

                return HttpResponse::TooManyRequests()
                    .insert_header(("Retry-After", detail.retry_after.to_string()))
                    .insert_header(("X-RateLimit-Limit", detail.limit.to_string()))
                    .insert_header(("X-RateLimit-Remaining", "0"))
                    .json(body);
            }
            AppError::InvalidApiKey => {
                return HttpResponse::Unauthorized()
                    .insert_header(("WWW-Authenticate", "ApiKey"))
                    .json(ErrorResponse::unauthorized().with_detail("Invalid API key"));
            }
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => {
                ErrorResponse::new(422, "Validation Failed").with_detail(errors.join(", "))
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<disorder_core::error::ApiKeyError> for AppError {
    fn from(err: disorder_core::error::ApiKeyError) -> Self {
        tracing::error!("API key lookup failed: {}", err);
        AppError::Internal("API key lookup failed".to_string())
    }
}

impl From<disorder_core::DomainError> for AppError {
    fn from(err: disorder_core::DomainError) -> Self {
        match err {
            disorder_core::DomainError::Validation(msg) => AppError::Validation(vec![msg]),
            disorder_core::DomainError::UnknownTier(tier) => {
                AppError::Internal(format!("unknown tier {}", tier))
            }
            disorder_core::DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

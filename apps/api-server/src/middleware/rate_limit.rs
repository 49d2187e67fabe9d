//! Rate limit enforcement for classify requests.
//!
//! The per-day quota is charged per sequence, so the increment is only
//! known once the body has been parsed. Handlers call [`enforce`] after
//! the batch size check and before any classification work.

use disorder_core::DualWindowLimiter;
use disorder_core::domain::Decision;

use crate::middleware::api_key::Caller;
use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;

/// Charge one request and `sequences` sequences to the caller.
pub async fn enforce(
    limiter: &DualWindowLimiter,
    caller: &Caller,
    sequences: u64,
    request_id: &RequestId,
) -> AppResult<()> {
    match limiter.check_tier(&caller.identity, &caller.limits, sequences).await {
        Decision::Allowed => Ok(()),
        Decision::Denied { message, detail } => {
            tracing::warn!(
                identity = %caller.identity,
                key_id = ?caller.key_id,
                code = %detail.error_code,
                limit = detail.limit,
                current = detail.current,
                retry_after = detail.retry_after,
                "Rate limit exceeded"
            );

            Err(AppError::RateLimited {
                message,
                detail,
                request_id: Some(request_id.as_str().to_string()),
            })
        }
    }
}

use actix_web::{HttpResponse, web};

use disorder_shared::dto::UsageResponse;

use crate::middleware::api_key::Caller;
use crate::state::AppState;

/// Current counters for the caller. Reading usage never charges a window.
///
/// GET /api/v1/usage
pub async fn usage(state: web::Data<AppState>, caller: Caller) -> HttpResponse {
    let usage = state.limiter.usage(&caller.identity).await;

    HttpResponse::Ok().json(UsageResponse {
        tier: caller.limits.tier.to_string(),
        requests_this_minute: usage.requests_this_minute,
        requests_per_minute_limit: caller.limits.requests_per_minute,
        sequences_today: usage.sequences_today,
        daily_limit: caller.limits.daily_limit,
    })
}

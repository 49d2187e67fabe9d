//! API key extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::Future;
use std::pin::Pin;

use disorder_core::domain::{Credential, IdentityHash, IdentityHasher, TierLimits};
use disorder_core::ports::ApiKeyRepository;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Header carrying the caller's API key.
pub static API_KEY_HEADER: &str = "X-API-Key";

/// The resolved caller of a request.
///
/// Requests without an API key share the anonymous identity on free-tier
/// limits. A key that is unknown or revoked is rejected with 401.
#[derive(Debug, Clone)]
pub struct Caller {
    pub identity: IdentityHash,
    pub limits: TierLimits,
    pub key_id: Option<uuid::Uuid>,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self {
            identity: IdentityHasher::hash(&Credential::Anonymous),
            limits: TierLimits::default(),
            key_id: None,
        }
    }
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();

        let api_key = match req.headers().get(API_KEY_HEADER) {
            None => None,
            Some(value) => match value.to_str() {
                Ok(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => return Box::pin(async { Err(AppError::InvalidApiKey) }),
            },
        };

        Box::pin(async move {
            let Some(api_key) = api_key else {
                return Ok(Caller::anonymous());
            };

            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AppError::Internal("Server configuration error".to_string()));
            };

            let digest = IdentityHasher::api_key_digest(&api_key);
            match state.api_keys.find_by_digest(&digest).await? {
                Some(record) => Ok(Caller {
                    identity: IdentityHasher::hash(&Credential::ApiKey(api_key)),
                    limits: record.limits,
                    key_id: Some(record.id),
                }),
                None => {
                    tracing::warn!("Rejected unknown or revoked API key");
                    Err(AppError::InvalidApiKey)
                }
            }
        })
    }
}

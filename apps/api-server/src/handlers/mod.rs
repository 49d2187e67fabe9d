//! HTTP handlers and route configuration.

mod classify;
mod health;
mod usage;

use actix_web::web;

use crate::middleware::error::AppError;

/// Largest accepted request body, JSON or FASTA.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_BODY_BYTES)
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
    .route("/", web::get().to(health::root))
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/api/v1")
            .route("/classify", web::post().to(classify::classify))
            .route("/classify/fasta", web::post().to(classify::classify_fasta))
            .route("/usage", web::get().to(usage::usage)),
    );
}

//! Service info and health check endpoints.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub rate_limit_backend: &'static str,
}

/// GET /
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(ServiceInfo {
        name: "Protein Disorder Classification API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            "GET /health",
            "POST /api/v1/classify",
            "POST /api/v1/classify/fasta",
            "GET /api/v1/usage",
        ],
    })
}

/// Health check endpoint - returns server status.
///
/// GET /health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let response = HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        rate_limit_backend: state.limiter.backend(),
    };

    HttpResponse::Ok().json(response)
}

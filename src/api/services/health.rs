use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use tracing::trace;

pub struct HealthService;

impl HealthService {
    /// Liveness probe; does not touch the store
    pub async fn health_check() -> impl Responder {
        trace!("Received health check request");
        HttpResponse::Ok().json(json!({ "status": "ok" }))
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
}

use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use tracing::error;

use crate::db::JobStore;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    store: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn probe(
    store: &dyn JobStore,
    up: &'static str,
    down: &'static str,
    context: &str,
) -> HttpResponse {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse {
            status: up,
            store: "connected",
            error: None,
        }),
        Err(e) => {
            error!("{} failed: {:?}", context, e);
            HttpResponse::ServiceUnavailable().json(HealthResponse {
                status: down,
                store: "disconnected",
                error: Some(format!("Store error: {}", e)),
            })
        }
    }
}

/// General health check including store connectivity.
#[get("/health")]
async fn health_check(store: web::Data<dyn JobStore>) -> impl Responder {
    probe(store.get_ref(), "healthy", "unhealthy", "Health check").await
}

/// Readiness probe; 503 while the store is unreachable.
#[get("/ready")]
async fn readiness_check(store: web::Data<dyn JobStore>) -> impl Responder {
    probe(store.get_ref(), "ready", "not_ready", "Readiness check").await
}

/// Liveness probe, does not touch the store.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive",
        store: "not_checked",
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}

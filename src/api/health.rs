//! Service root and health check endpoints.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use sea_orm::ConnectionTrait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::db::DbPool;

/// Welcome message returned at the service root.
#[derive(Serialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Static health/status payload.
#[derive(Serialize, ToSchema)]
pub struct StatusResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Readiness check response.
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// Service root with a welcome message.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Welcome message", body = WelcomeResponse)
    )
)]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(WelcomeResponse {
        message: "Welcome to the TestTrace test management platform".to_string(),
    })
}

/// Static health/status payload.
///
/// Returns 200 with service identity whenever the process is up; no
/// dependencies are touched.
#[utoipa::path(
    get,
    path = "/status",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = StatusResponse)
    )
)]
pub async fn status() -> HttpResponse {
    HttpResponse::Ok().json(StatusResponse {
        status: "ok",
        service: "testtrace-server",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check endpoint.
///
/// Returns 200 if the service is ready to accept requests (database connected).
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service unavailable")
    )
)]
pub async fn ready(pool: web::Data<DbPool>) -> HttpResponse {
    // Try a simple query to verify database connectivity
    let stmt =
        sea_orm::Statement::from_string(sea_orm::DatabaseBackend::Postgres, "SELECT 1".to_owned());
    match pool.connection().query_one(stmt).await {
        Ok(_) => HttpResponse::Ok().json(ReadyResponse {
            status: "ready",
            database: "connected",
        }),
        Err(_) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "error": "NOT_READY",
            "message": "Database connection failed"
        })),
    }
}

/// Configure health routes.
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(root)))
        .service(web::resource("/status").route(web::get().to(status)))
        .service(web::resource("/ready").route(web::get().to(ready)));
}

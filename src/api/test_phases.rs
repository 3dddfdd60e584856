//! Test phase API handlers.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::test_phases::NewTestPhase;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateTestPhaseRequest, PaginationParams, PhaseStatus, TestPhaseResponse,
};

/// Paginated test phase list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TestPhaseListResponse {
    pub phases: Vec<TestPhaseResponse>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Create a test phase under an existing run.
///
/// A phase created as `failed` eagerly marks its parent run failed; the
/// propagation is never automatically reversed.
#[utoipa::path(
    post,
    path = "/phases",
    tag = "Test Phases",
    request_body = CreateTestPhaseRequest,
    responses(
        (status = 200, description = "Test phase created", body = TestPhaseResponse),
        (status = 400, description = "Unknown status", body = crate::error::ErrorResponse),
        (status = 404, description = "Parent run not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_test_phase(
    pool: web::Data<DbPool>,
    body: web::Json<CreateTestPhaseRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let status = match req.status.as_deref() {
        Some(s) => PhaseStatus::parse(s)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown status '{}'", s)))?,
        None => PhaseStatus::Pending,
    };

    let phase = pool
        .insert_test_phase(NewTestPhase {
            test_run_id: req.test_run_id,
            name: req.name,
            description: req.description,
            status,
            measurements: req.measurements,
            duration: req.duration,
        })
        .await?;

    tracing::info!(
        phase_id = phase.id,
        run_id = phase.test_run_id,
        status = %phase.status,
        "Created test phase"
    );

    Ok(HttpResponse::Ok().json(TestPhaseResponse::from(phase)))
}

/// List the phases of a run, oldest first.
#[utoipa::path(
    get,
    path = "/runs/{id}/phases",
    tag = "Test Phases",
    params(
        ("id" = i32, Path, description = "Test run id"),
        ("offset" = Option<u64>, Query, description = "Pagination offset"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 100, max 100)")
    ),
    responses(
        (status = 200, description = "Phases of the run", body = TestPhaseListResponse),
        (status = 404, description = "Test run not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_run_phases(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    query: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let run_id = path.into_inner();

    let (phases, total) = pool.list_phases_for_run(run_id, &query).await?;

    Ok(HttpResponse::Ok().json(TestPhaseListResponse {
        phases: phases.into_iter().map(TestPhaseResponse::from).collect(),
        total,
        limit: query.clamped_limit(),
        offset: query.offset(),
    }))
}

/// Configure test phase routes (legacy and renamed path families).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/phases", "/test-phases"]).route(web::post().to(create_test_phase)),
    )
    .service(
        web::resource(["/runs/{id}/phases", "/test-runs/{id}/phases"])
            .route(web::get().to(list_run_phases)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::entity::test_run;

    #[actix_web::test]
    async fn test_create_phase_with_unknown_status_is_400() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let pool = DbPool::from_connection(db);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/test-phases")
            .set_json(serde_json::json!({
                "name": "Voltage Measurement",
                "test_run_id": 1,
                "status": "EXPLODED"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_phases_of_missing_run_is_404() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<test_run::Model>::new()])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/runs/999/phases").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}

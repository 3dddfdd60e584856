//! Test run API handlers.
//!
//! Every operation is reachable through both the legacy path family
//! (`/test-runs/...`, what the original clients still call) and the renamed
//! one (`/runs/...`); both resolve to the same handler.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::test_runs::{ListTestRunsParams, NewTestRun};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateTestRunRequest, PaginationParams, RunStatus, TestPhaseResponse, TestRunDetailResponse,
    TestRunResponse, UpdateRunStatusRequest,
};

/// Paginated test run list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TestRunListResponse {
    pub runs: Vec<TestRunResponse>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Query parameters for the run listing.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ListRunsQuery {
    /// Filter by status (case-insensitive)
    pub status: Option<String>,
    /// Filter by unit-under-test identifier
    pub uut_id: Option<String>,
    /// Pagination offset
    pub offset: Option<u64>,
    /// Results per page (default 100, max 100)
    pub limit: Option<u64>,
}

/// Create a new test run.
///
/// The run starts in the `pending` status with an auto-incrementing id.
#[utoipa::path(
    post,
    path = "/runs",
    tag = "Test Runs",
    request_body = CreateTestRunRequest,
    responses(
        (status = 200, description = "Test run created", body = TestRunResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_test_run(
    pool: web::Data<DbPool>,
    body: web::Json<CreateTestRunRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let run = pool
        .insert_test_run(NewTestRun {
            name: req.name,
            uut_id: req.uut_id,
            uut_serial: req.uut_serial,
            meta_data: req.meta_data,
        })
        .await?;

    tracing::info!(run_id = run.id, name = %run.name, "Created test run");

    Ok(HttpResponse::Ok().json(TestRunResponse::from(run)))
}

/// List test runs with offset/limit pagination, newest first.
#[utoipa::path(
    get,
    path = "/runs",
    tag = "Test Runs",
    params(
        ("status" = Option<String>, Query, description = "Filter by status"),
        ("uut_id" = Option<String>, Query, description = "Filter by unit-under-test id"),
        ("offset" = Option<u64>, Query, description = "Pagination offset"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 100, max 100)")
    ),
    responses(
        (status = 200, description = "List of test runs", body = TestRunListResponse),
        (status = 400, description = "Unknown status filter", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_test_runs(
    pool: web::Data<DbPool>,
    query: web::Query<ListRunsQuery>,
) -> AppResult<HttpResponse> {
    let status = match query.status.as_deref() {
        Some(s) => Some(
            RunStatus::parse(s)
                .ok_or_else(|| AppError::InvalidInput(format!("unknown status '{}'", s)))?,
        ),
        None => None,
    };

    let pagination = PaginationParams {
        offset: query.offset,
        limit: query.limit,
    };

    let params = ListTestRunsParams {
        status,
        uut_id: query.uut_id.clone(),
        limit: pagination.clamped_limit(),
        offset: pagination.offset(),
    };

    let (runs, total) = pool.list_test_runs(&params).await?;

    Ok(HttpResponse::Ok().json(TestRunListResponse {
        runs: runs.into_iter().map(TestRunResponse::from).collect(),
        total,
        limit: params.limit,
        offset: params.offset,
    }))
}

/// Get a test run by id, with its phases embedded.
///
/// The embedded list carries at most one page of phases (100, oldest first);
/// longer runs page through `GET /runs/{id}/phases` with offset/limit.
#[utoipa::path(
    get,
    path = "/runs/{id}",
    tag = "Test Runs",
    params(
        ("id" = i32, Path, description = "Test run id")
    ),
    responses(
        (status = 200, description = "Test run detail", body = TestRunDetailResponse),
        (status = 404, description = "Test run not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_test_run(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let run = pool
        .get_test_run_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Test run {}", id)))?;

    let (phases, _) = pool
        .list_phases_for_run(id, &PaginationParams::default())
        .await?;

    let phases = phases.into_iter().map(TestPhaseResponse::from).collect();

    Ok(HttpResponse::Ok().json(TestRunDetailResponse::new(run, phases)))
}

/// Update a run's status.
///
/// Status transitions are plain assignments; any status may follow any other.
/// Unknown status strings are rejected with 400.
#[utoipa::path(
    put,
    path = "/runs/{id}/status",
    tag = "Test Runs",
    params(
        ("id" = i32, Path, description = "Test run id")
    ),
    request_body = UpdateRunStatusRequest,
    responses(
        (status = 200, description = "Updated test run", body = TestRunResponse),
        (status = 400, description = "Unknown status", body = crate::error::ErrorResponse),
        (status = 404, description = "Test run not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_run_status(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<UpdateRunStatusRequest>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let req = body.into_inner();

    let status = RunStatus::parse(&req.status)
        .ok_or_else(|| AppError::InvalidInput(format!("unknown status '{}'", req.status)))?;

    let run = pool.update_test_run_status(id, status, req.results).await?;

    tracing::info!(run_id = id, status = %status, "Updated test run status");

    Ok(HttpResponse::Ok().json(TestRunResponse::from(run)))
}

/// Configure test run routes. Each resource is registered under both the
/// legacy and the renamed path; specific paths come before generic ones.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["/runs/{id}/status", "/test-runs/{id}/status"])
            .route(web::put().to(update_run_status)),
    )
    .service(web::resource(["/runs/{id}", "/test-runs/{id}"]).route(web::get().to(get_test_run)))
    .service(
        web::resource(["/runs", "/test-runs"])
            .route(web::post().to(create_test_run))
            .route(web::get().to(list_test_runs)),
    );
}

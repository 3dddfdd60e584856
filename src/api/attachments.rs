//! Attachment API handlers.
//!
//! Attachments carry either a filesystem path or an inline base64 payload,
//! and must reference exactly one parent (run or phase).

use actix_web::{web, HttpResponse};
use base64::Engine;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::attachments::NewAttachment;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{AttachmentResponse, CreateAttachmentRequest, PaginationParams};

/// Paginated attachment list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttachmentListResponse {
    pub attachments: Vec<AttachmentResponse>,
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Create an attachment for a run or a phase.
#[utoipa::path(
    post,
    path = "/attachments",
    tag = "Attachments",
    request_body = CreateAttachmentRequest,
    responses(
        (status = 200, description = "Attachment created", body = AttachmentResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Parent not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_attachment(
    pool: web::Data<DbPool>,
    body: web::Json<CreateAttachmentRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    match (req.test_run_id, req.phase_id) {
        (Some(_), None) | (None, Some(_)) => {}
        (None, None) => {
            return Err(AppError::InvalidInput(
                "attachment must reference a test_run_id or a phase_id".to_string(),
            ));
        }
        (Some(_), Some(_)) => {
            return Err(AppError::InvalidInput(
                "attachment cannot reference both a test_run_id and a phase_id".to_string(),
            ));
        }
    }

    if req.file_path.is_some() && req.data.is_some() {
        return Err(AppError::InvalidInput(
            "attachment cannot carry both a file_path and inline data".to_string(),
        ));
    }

    let file_data = match req.data {
        Some(ref encoded) => Some(
            base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| AppError::InvalidInput(format!("invalid base64 data: {}", e)))?,
        ),
        None => None,
    };

    let file_size = file_data.as_ref().map(|d| d.len() as i64);

    let attachment = pool
        .insert_attachment(NewAttachment {
            filename: req.filename,
            content_type: req.content_type,
            file_size,
            file_path: req.file_path,
            file_data,
            description: req.description,
            test_run_id: req.test_run_id,
            phase_id: req.phase_id,
        })
        .await?;

    tracing::info!(
        attachment_id = attachment.id,
        filename = %attachment.filename,
        "Created attachment"
    );

    Ok(HttpResponse::Ok().json(AttachmentResponse::from(attachment)))
}

/// Get attachment metadata by id.
#[utoipa::path(
    get,
    path = "/attachments/{id}",
    tag = "Attachments",
    params(
        ("id" = i32, Path, description = "Attachment id")
    ),
    responses(
        (status = 200, description = "Attachment metadata", body = AttachmentResponse),
        (status = 404, description = "Attachment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_attachment(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let attachment = pool
        .get_attachment_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attachment {}", id)))?;

    Ok(HttpResponse::Ok().json(AttachmentResponse::from(attachment)))
}

/// Download the inline payload of an attachment.
#[utoipa::path(
    get,
    path = "/attachments/{id}/content",
    tag = "Attachments",
    params(
        ("id" = i32, Path, description = "Attachment id")
    ),
    responses(
        (status = 200, description = "Attachment payload"),
        (status = 404, description = "Attachment or payload not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_attachment_content(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let attachment = pool
        .get_attachment_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Attachment {}", id)))?;

    let data = attachment
        .file_data
        .ok_or_else(|| AppError::NotFound(format!("Attachment {} payload", id)))?;

    let content_type = attachment
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", attachment.filename),
        ))
        .body(data))
}

/// List attachments of a run.
#[utoipa::path(
    get,
    path = "/runs/{id}/attachments",
    tag = "Attachments",
    params(
        ("id" = i32, Path, description = "Test run id"),
        ("offset" = Option<u64>, Query, description = "Pagination offset"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 100, max 100)")
    ),
    responses(
        (status = 200, description = "Attachments of the run", body = AttachmentListResponse),
        (status = 404, description = "Test run not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_run_attachments(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    query: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let run_id = path.into_inner();

    let (attachments, total) = pool.list_attachments_for_run(run_id, &query).await?;

    Ok(HttpResponse::Ok().json(AttachmentListResponse {
        attachments: attachments.into_iter().map(AttachmentResponse::from).collect(),
        total,
        limit: query.clamped_limit(),
        offset: query.offset(),
    }))
}

/// List attachments of a phase.
#[utoipa::path(
    get,
    path = "/phases/{id}/attachments",
    tag = "Attachments",
    params(
        ("id" = i32, Path, description = "Test phase id"),
        ("offset" = Option<u64>, Query, description = "Pagination offset"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 100, max 100)")
    ),
    responses(
        (status = 200, description = "Attachments of the phase", body = AttachmentListResponse),
        (status = 404, description = "Test phase not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_phase_attachments(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    query: web::Query<PaginationParams>,
) -> AppResult<HttpResponse> {
    let phase_id = path.into_inner();

    let (attachments, total) = pool.list_attachments_for_phase(phase_id, &query).await?;

    Ok(HttpResponse::Ok().json(AttachmentListResponse {
        attachments: attachments.into_iter().map(AttachmentResponse::from).collect(),
        total,
        limit: query.clamped_limit(),
        offset: query.offset(),
    }))
}

/// Configure attachment routes (legacy and renamed path families).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/attachments/{id}/content").route(web::get().to(get_attachment_content)),
    )
    .service(web::resource("/attachments/{id}").route(web::get().to(get_attachment)))
    .service(web::resource("/attachments").route(web::post().to(create_attachment)))
    .service(
        web::resource(["/runs/{id}/attachments", "/test-runs/{id}/attachments"])
            .route(web::get().to(list_run_attachments)),
    )
    .service(
        web::resource(["/phases/{id}/attachments", "/test-phases/{id}/attachments"])
            .route(web::get().to(list_phase_attachments)),
    );
}

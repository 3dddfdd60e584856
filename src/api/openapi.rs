//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "TestTrace Server",
        version = "0.1.0",
        description = "API server for recording hardware test runs, phases, measurements, and attachments"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::root,
        api::health::status,
        api::health::ready,
        // Test run endpoints
        api::test_runs::create_test_run,
        api::test_runs::list_test_runs,
        api::test_runs::get_test_run,
        api::test_runs::update_run_status,
        // Test phase endpoints
        api::test_phases::create_test_phase,
        api::test_phases::list_run_phases,
        // Attachment endpoints
        api::attachments::create_attachment,
        api::attachments::get_attachment,
        api::attachments::get_attachment_content,
        api::attachments::list_run_attachments,
        api::attachments::list_phase_attachments,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::PaginationParams,
            // Health
            api::health::WelcomeResponse,
            api::health::StatusResponse,
            api::health::ReadyResponse,
            // Test runs
            models::RunStatus,
            models::CreateTestRunRequest,
            models::UpdateRunStatusRequest,
            models::TestRunResponse,
            models::TestRunDetailResponse,
            api::test_runs::TestRunListResponse,
            api::test_runs::ListRunsQuery,
            // Test phases
            models::PhaseStatus,
            models::CreateTestPhaseRequest,
            models::TestPhaseResponse,
            api::test_phases::TestPhaseListResponse,
            // Attachments
            models::CreateAttachmentRequest,
            models::AttachmentResponse,
            api::attachments::AttachmentListResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Test Runs", description = "Test run creation, listing, and status updates"),
        (name = "Test Phases", description = "Test phases and their measurements"),
        (name = "Attachments", description = "Files attached to runs and phases")
    )
)]
pub struct ApiDoc;

//! Domain models and API payload types for the test-result recording service.

use utoipa::ToSchema;

pub mod attachment;
pub mod test_phase;
pub mod test_run;

// Re-export commonly used types
pub use attachment::{AttachmentResponse, CreateAttachmentRequest};
pub use test_phase::{CreateTestPhaseRequest, PhaseStatus, TestPhaseResponse};
pub use test_run::{
    CreateTestRunRequest, RunStatus, TestRunDetailResponse, TestRunResponse,
    UpdateRunStatusRequest,
};

/// Offset/limit pagination parameters.
#[derive(Debug, Clone, Default, serde::Deserialize, ToSchema)]
pub struct PaginationParams {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

const DEFAULT_LIMIT: u64 = 100;
const MAX_LIMIT: u64 = 100;

impl PaginationParams {
    /// Offset for database queries.
    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }

    /// Limit clamped to the maximum allowed value.
    pub fn clamped_limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

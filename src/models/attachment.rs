//! Attachment model: files linked to test runs or test phases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::attachment;

/// Request body for creating an attachment.
///
/// The payload is either a filesystem path (`file_path`) or inline base64
/// (`data`), and the attachment must reference exactly one of `test_run_id`
/// or `phase_id`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAttachmentRequest {
    pub filename: String,
    pub content_type: Option<String>,
    pub description: Option<String>,
    /// Path to file if stored in the filesystem
    pub file_path: Option<String>,
    /// Base64-encoded inline payload if stored in the database
    pub data: Option<String>,
    pub test_run_id: Option<i32>,
    pub phase_id: Option<i32>,
}

/// Attachment metadata as returned by the API. The binary payload is served
/// separately via the content endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachmentResponse {
    pub id: i32,
    pub filename: String,
    pub content_type: Option<String>,
    pub file_size: Option<i64>,
    pub file_path: Option<String>,
    pub description: Option<String>,
    /// Whether an inline payload is stored in the database
    pub has_data: bool,
    pub test_run_id: Option<i32>,
    pub phase_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<attachment::Model> for AttachmentResponse {
    fn from(m: attachment::Model) -> Self {
        AttachmentResponse {
            id: m.id,
            filename: m.filename,
            content_type: m.content_type,
            file_size: m.file_size,
            file_path: m.file_path,
            description: m.description,
            has_data: m.file_data.is_some(),
            test_run_id: m.test_run_id,
            phase_id: m.phase_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

//! Test run model: one execution of a test sequence against a unit under test.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::entity::test_run;
use crate::models::TestPhaseResponse;

/// Test run lifecycle status.
///
/// Transitions are plain assignments; any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Passed,
    Failed,
    Error,
}

impl RunStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Error => "error",
        }
    }

    /// Parse from string representation, case-insensitively.
    ///
    /// Returns None for unknown statuses so callers can reject them with a
    /// client error instead of silently coercing.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request body for creating a test run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTestRunRequest {
    /// Test run name
    pub name: String,
    /// Unit under test identifier
    pub uut_id: Option<String>,
    /// Unit under test serial number
    pub uut_serial: Option<String>,
    /// Free-form metadata blob
    pub meta_data: Option<JsonValue>,
}

/// Request body for updating a run's status.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateRunStatusRequest {
    /// New status string (case-insensitive)
    pub status: String,
    /// Optional results blob recorded alongside the status
    pub results: Option<JsonValue>,
}

/// Test run as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestRunResponse {
    pub id: i32,
    pub name: String,
    pub status: String,
    pub meta_data: Option<JsonValue>,
    pub results: Option<JsonValue>,
    pub uut_id: Option<String>,
    pub uut_serial: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<test_run::Model> for TestRunResponse {
    fn from(m: test_run::Model) -> Self {
        TestRunResponse {
            id: m.id,
            name: m.name,
            status: m.status,
            meta_data: m.meta_data,
            results: m.results,
            uut_id: m.uut_id,
            uut_serial: m.uut_serial,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Test run detail with its phases embedded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestRunDetailResponse {
    pub id: i32,
    pub name: String,
    pub status: String,
    pub meta_data: Option<JsonValue>,
    pub results: Option<JsonValue>,
    pub uut_id: Option<String>,
    pub uut_serial: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub phases: Vec<TestPhaseResponse>,
}

impl TestRunDetailResponse {
    /// Build a detail response from a run and its phases.
    pub fn new(run: test_run::Model, phases: Vec<TestPhaseResponse>) -> Self {
        TestRunDetailResponse {
            id: run.id,
            name: run.name,
            status: run.status,
            meta_data: run.meta_data,
            results: run.results,
            uut_id: run.uut_id,
            uut_serial: run.uut_serial,
            created_at: run.created_at,
            updated_at: run.updated_at,
            phases,
        }
    }
}

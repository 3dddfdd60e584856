//! Test phase model: a named sub-step of a test run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::entity::test_phase;

/// Test phase lifecycle status. Adds `skipped` to the run statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStatus {
    Pending,
    Running,
    Passed,
    Failed,
    Skipped,
    Error,
}

impl PhaseStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }

    /// Parse from string representation, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "skipped" => Some(Self::Skipped),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Whether this status marks the parent run failed.
    pub fn fails_parent_run(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

impl std::fmt::Display for PhaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request body for creating a test phase.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTestPhaseRequest {
    /// Phase name
    pub name: String,
    /// Parent test run id
    pub test_run_id: i32,
    /// Optional description
    pub description: Option<String>,
    /// Status string (case-insensitive, default: pending)
    pub status: Option<String>,
    /// Measurement map (values, units, limits, PASS/FAIL verdicts)
    pub measurements: Option<JsonValue>,
    /// Duration in seconds
    pub duration: Option<f64>,
}

/// Test phase as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestPhaseResponse {
    pub id: i32,
    pub test_run_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub measurements: Option<JsonValue>,
    pub duration: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<test_phase::Model> for TestPhaseResponse {
    fn from(m: test_phase::Model) -> Self {
        TestPhaseResponse {
            id: m.id,
            test_run_id: m.test_run_id,
            name: m.name,
            description: m.description,
            status: m.status,
            measurements: m.measurements,
            duration: m.duration,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_status_round_trip() {
        for status in [
            PhaseStatus::Pending,
            PhaseStatus::Running,
            PhaseStatus::Passed,
            PhaseStatus::Failed,
            PhaseStatus::Skipped,
            PhaseStatus::Error,
        ] {
            assert_eq!(PhaseStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_only_failed_propagates_to_run() {
        assert!(PhaseStatus::Failed.fails_parent_run());
        assert!(!PhaseStatus::Error.fails_parent_run());
        assert!(!PhaseStatus::Passed.fails_parent_run());
        assert!(!PhaseStatus::Skipped.fails_parent_run());
    }

    #[test]
    fn test_unknown_phase_status_rejected() {
        assert_eq!(PhaseStatus::parse("aborted"), None);
    }
}

//! Database queries for test phases.
//!
//! Phase creation and the failed-phase propagation to the parent run happen
//! inside a single transaction; an error rolls both writes back.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use serde_json::Value as JsonValue;

use crate::entity::test_phase::{self, ActiveModel as PhaseActiveModel, Entity as TestPhase};
use crate::entity::test_run::{self, ActiveModel as RunActiveModel, Entity as TestRun};
use crate::error::{AppError, AppResult};
use crate::models::{PaginationParams, PhaseStatus, RunStatus};

use super::DbPool;

/// Represents a test phase to be inserted.
pub struct NewTestPhase {
    pub test_run_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: PhaseStatus,
    pub measurements: Option<JsonValue>,
    pub duration: Option<f64>,
}

impl DbPool {
    /// Insert a new test phase.
    ///
    /// Verifies the parent run exists (404 otherwise) and, when the phase is
    /// failed, eagerly marks the parent run failed. The propagation is
    /// one-directional: a later passing phase never un-fails the run.
    pub async fn insert_test_phase(&self, phase: NewTestPhase) -> AppResult<test_phase::Model> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let run = TestRun::find_by_id(phase.test_run_id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test run: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("Test run {}", phase.test_run_id)))?;

        let now = Utc::now();

        let model = PhaseActiveModel {
            id: NotSet,
            test_run_id: Set(phase.test_run_id),
            name: Set(phase.name),
            description: Set(phase.description),
            status: Set(phase.status.as_str().to_string()),
            measurements: Set(phase.measurements),
            duration: Set(phase.duration),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test phase: {}", e)))?;

        if phase.status.fails_parent_run() && run.status != RunStatus::Failed.as_str() {
            let mut active: RunActiveModel = run.into();
            active.status = Set(RunStatus::Failed.as_str().to_string());
            active.updated_at = Set(now);
            active
                .update(&txn)
                .await
                .map_err(|e| AppError::Database(format!("Failed to fail parent run: {}", e)))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))?;

        Ok(inserted)
    }

    /// List the phases of a run with offset/limit pagination, oldest first.
    ///
    /// Returns NotFound if the run itself does not exist.
    pub async fn list_phases_for_run(
        &self,
        run_id: i32,
        params: &PaginationParams,
    ) -> AppResult<(Vec<test_phase::Model>, u64)> {
        self.get_test_run_by_id(run_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test run {}", run_id)))?;

        let select = TestPhase::find().filter(test_phase::Column::TestRunId.eq(run_id));

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test phases: {}", e)))?;

        let phases = select
            .order_by_asc(test_phase::Column::CreatedAt)
            .offset(params.offset())
            .limit(params.clamped_limit())
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test phases: {}", e)))?;

        Ok((phases, total))
    }

    /// Get a test phase by ID.
    pub async fn get_test_phase_by_id(&self, id: i32) -> AppResult<Option<test_phase::Model>> {
        let result = TestPhase::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test phase: {}", e)))?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn run_model(id: i32, status: &str) -> test_run::Model {
        let now = Utc::now();
        test_run::Model {
            id,
            name: "Motor Test - SN100".to_string(),
            status: status.to_string(),
            meta_data: None,
            results: None,
            uut_id: Some("MOTOR-100".to_string()),
            uut_serial: Some("SN100".to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    fn phase_model(id: i32, run_id: i32, status: &str) -> test_phase::Model {
        let now = Utc::now();
        test_phase::Model {
            id,
            test_run_id: run_id,
            name: "Motor Startup".to_string(),
            description: None,
            status: status.to_string(),
            measurements: None,
            duration: Some(2.0),
            created_at: now,
            updated_at: now,
        }
    }

    fn new_phase(run_id: i32, status: PhaseStatus) -> NewTestPhase {
        NewTestPhase {
            test_run_id: run_id,
            name: "Motor Startup".to_string(),
            description: None,
            status,
            measurements: None,
            duration: Some(2.0),
        }
    }

    #[tokio::test]
    async fn test_failed_phase_marks_parent_run_failed() {
        // Consumed in order: run lookup, phase insert, run update
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![run_model(1, "running")]])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 7,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .append_query_results([vec![phase_model(7, 1, "failed")]])
            .append_query_results([vec![run_model(1, "failed")]])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let phase = pool
            .insert_test_phase(new_phase(1, PhaseStatus::Failed))
            .await
            .unwrap();

        assert_eq!(phase.status, "failed");
        assert_eq!(phase.test_run_id, 1);
    }

    #[tokio::test]
    async fn test_passing_phase_leaves_run_untouched() {
        // No run-update result is queued; a propagation write would error
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![run_model(1, "failed")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 8,
                rows_affected: 1,
            }])
            .append_query_results([vec![phase_model(8, 1, "passed")]])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let phase = pool
            .insert_test_phase(new_phase(1, PhaseStatus::Passed))
            .await
            .unwrap();

        assert_eq!(phase.status, "passed");
    }

    #[tokio::test]
    async fn test_phase_for_missing_run_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<test_run::Model>::new()])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let err = pool
            .insert_test_phase(new_phase(999, PhaseStatus::Pending))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_phases_for_missing_run_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<test_run::Model>::new()])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let err = pool
            .list_phases_for_run(999, &PaginationParams::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}

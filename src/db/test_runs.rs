//! Database queries for test runs.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde_json::Value as JsonValue;

use crate::entity::test_run::{self, ActiveModel, Column, Entity as TestRun};
use crate::error::{AppError, AppResult};
use crate::models::RunStatus;

use super::DbPool;

/// Represents a test run to be inserted.
pub struct NewTestRun {
    pub name: String,
    pub uut_id: Option<String>,
    pub uut_serial: Option<String>,
    pub meta_data: Option<JsonValue>,
}

/// Query parameters for listing test runs.
#[derive(Debug, Default)]
pub struct ListTestRunsParams {
    pub status: Option<RunStatus>,
    pub uut_id: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

impl DbPool {
    /// Insert a new test run with the default pending status.
    pub async fn insert_test_run(&self, run: NewTestRun) -> AppResult<test_run::Model> {
        let now = Utc::now();

        let model = ActiveModel {
            id: NotSet,
            name: Set(run.name),
            status: Set(RunStatus::Pending.as_str().to_string()),
            meta_data: Set(run.meta_data),
            results: Set(None),
            uut_id: Set(run.uut_id),
            uut_serial: Set(run.uut_serial),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert test run: {}", e)))?;

        Ok(result)
    }

    /// Get a test run by ID.
    pub async fn get_test_run_by_id(&self, id: i32) -> AppResult<Option<test_run::Model>> {
        let result = TestRun::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get test run: {}", e)))?;

        Ok(result)
    }

    /// List test runs with optional filtering, newest first.
    pub async fn list_test_runs(
        &self,
        params: &ListTestRunsParams,
    ) -> AppResult<(Vec<test_run::Model>, u64)> {
        let mut select = TestRun::find();

        if let Some(status) = params.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        if let Some(ref uut_id) = params.uut_id {
            select = select.filter(Column::UutId.eq(uut_id.clone()));
        }

        // Count total before pagination
        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count test runs: {}", e)))?;

        let runs = select
            .order_by_desc(Column::CreatedAt)
            .offset(params.offset)
            .limit(params.limit)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list test runs: {}", e)))?;

        Ok((runs, total))
    }

    /// Update a run's status, optionally recording a results blob.
    pub async fn update_test_run_status(
        &self,
        id: i32,
        status: RunStatus,
        results: Option<JsonValue>,
    ) -> AppResult<test_run::Model> {
        let run = self
            .get_test_run_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test run {}", id)))?;

        let mut active: ActiveModel = run.into();
        active.status = Set(status.as_str().to_string());
        if let Some(results) = results {
            active.results = Set(Some(results));
        }
        active.updated_at = Set(Utc::now());

        let result = active
            .update(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to update test run status: {}", e)))?;

        Ok(result)
    }
}

//! Database queries for attachments.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::entity::attachment::{self, ActiveModel, Column, Entity as Attachment};
use crate::error::{AppError, AppResult};
use crate::models::PaginationParams;

use super::DbPool;

/// Represents an attachment to be inserted.
pub struct NewAttachment {
    pub filename: String,
    pub content_type: Option<String>,
    pub file_size: Option<i64>,
    pub file_path: Option<String>,
    pub file_data: Option<Vec<u8>>,
    pub description: Option<String>,
    pub test_run_id: Option<i32>,
    pub phase_id: Option<i32>,
}

impl DbPool {
    /// Insert a new attachment after verifying its parent exists.
    pub async fn insert_attachment(&self, att: NewAttachment) -> AppResult<attachment::Model> {
        if let Some(run_id) = att.test_run_id {
            self.get_test_run_by_id(run_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Test run {}", run_id)))?;
        }

        if let Some(phase_id) = att.phase_id {
            self.get_test_phase_by_id(phase_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Test phase {}", phase_id)))?;
        }

        let now = Utc::now();

        let model = ActiveModel {
            id: NotSet,
            filename: Set(att.filename),
            content_type: Set(att.content_type),
            file_size: Set(att.file_size),
            file_path: Set(att.file_path),
            file_data: Set(att.file_data),
            description: Set(att.description),
            test_run_id: Set(att.test_run_id),
            phase_id: Set(att.phase_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert attachment: {}", e)))?;

        Ok(result)
    }

    /// Get an attachment by ID.
    pub async fn get_attachment_by_id(&self, id: i32) -> AppResult<Option<attachment::Model>> {
        let result = Attachment::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get attachment: {}", e)))?;

        Ok(result)
    }

    /// List attachments belonging to a run. NotFound if the run is missing.
    pub async fn list_attachments_for_run(
        &self,
        run_id: i32,
        params: &PaginationParams,
    ) -> AppResult<(Vec<attachment::Model>, u64)> {
        self.get_test_run_by_id(run_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test run {}", run_id)))?;

        self.list_attachments(Column::TestRunId.eq(run_id), params)
            .await
    }

    /// List attachments belonging to a phase. NotFound if the phase is missing.
    pub async fn list_attachments_for_phase(
        &self,
        phase_id: i32,
        params: &PaginationParams,
    ) -> AppResult<(Vec<attachment::Model>, u64)> {
        self.get_test_phase_by_id(phase_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Test phase {}", phase_id)))?;

        self.list_attachments(Column::PhaseId.eq(phase_id), params)
            .await
    }

    async fn list_attachments(
        &self,
        filter: sea_orm::sea_query::SimpleExpr,
        params: &PaginationParams,
    ) -> AppResult<(Vec<attachment::Model>, u64)> {
        let select = Attachment::find().filter(filter);

        let total = select
            .clone()
            .count(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count attachments: {}", e)))?;

        let attachments = select
            .order_by_asc(Column::CreatedAt)
            .offset(params.offset())
            .limit(params.clamped_limit())
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list attachments: {}", e)))?;

        Ok((attachments, total))
    }
}

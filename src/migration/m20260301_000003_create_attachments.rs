//! Migration: Create attachments table.
//!
//! File attachments linked to either a test run or a test phase. Both FKs are
//! nullable; the API layer enforces exactly one parent.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE attachments (
                    id SERIAL PRIMARY KEY,

                    filename VARCHAR(500) NOT NULL,
                    content_type VARCHAR(200),
                    file_size BIGINT,

                    -- Path to file if stored in the filesystem
                    file_path TEXT,
                    -- Binary payload if stored in the database
                    file_data BYTEA,

                    description TEXT,

                    test_run_id INTEGER REFERENCES test_runs(id) ON DELETE CASCADE,
                    phase_id INTEGER REFERENCES test_phases(id) ON DELETE CASCADE,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_attachments_test_run_id ON attachments(test_run_id);
                CREATE INDEX idx_attachments_phase_id ON attachments(phase_id);

                CREATE TRIGGER update_attachments_updated_at
                    BEFORE UPDATE ON attachments
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_attachments_updated_at ON attachments;
                DROP TABLE IF EXISTS attachments CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}

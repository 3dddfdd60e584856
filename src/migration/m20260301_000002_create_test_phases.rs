//! Migration: Create test_phases table.
//!
//! Named sub-steps of a test run carrying their own status and measurements.

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
                CREATE TABLE test_phases (
                    id SERIAL PRIMARY KEY,
                    test_run_id INTEGER NOT NULL REFERENCES test_runs(id) ON DELETE CASCADE,

                    name VARCHAR(500) NOT NULL,
                    description TEXT,

                    -- Phase status adds 'skipped' to the run statuses
                    status VARCHAR(20) NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'running', 'passed', 'failed', 'skipped', 'error')),

                    -- Measurement map: values, units, limits, PASS/FAIL verdicts
                    measurements JSONB,

                    -- Duration in seconds
                    duration DOUBLE PRECISION,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_test_phases_test_run_id ON test_phases(test_run_id);
                CREATE INDEX idx_test_phases_name ON test_phases(name);
                CREATE INDEX idx_test_phases_status ON test_phases(test_run_id, status);

                CREATE TRIGGER update_test_phases_updated_at
                    BEFORE UPDATE ON test_phases
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
                DROP TRIGGER IF EXISTS update_test_phases_updated_at ON test_phases;
                DROP TABLE IF EXISTS test_phases CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}

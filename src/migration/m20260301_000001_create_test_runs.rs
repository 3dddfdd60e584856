//! Migration: Create test_runs table.
//!
//! Top-level record of one execution of a test sequence against a unit under test.

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
                CREATE TABLE test_runs (
                    id SERIAL PRIMARY KEY,
                    name VARCHAR(500) NOT NULL,

                    -- Lifecycle status (plain assignments, no state machine)
                    status VARCHAR(20) NOT NULL DEFAULT 'pending'
                        CHECK (status IN ('pending', 'running', 'passed', 'failed', 'error')),

                    -- Free-form blobs
                    meta_data JSONB,
                    results JSONB,

                    -- Unit under test
                    uut_id VARCHAR(200),
                    uut_serial VARCHAR(200),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_test_runs_name ON test_runs(name);
                CREATE INDEX idx_test_runs_uut_id ON test_runs(uut_id);
                CREATE INDEX idx_test_runs_uut_serial ON test_runs(uut_serial);
                CREATE INDEX idx_test_runs_status ON test_runs(status);
                CREATE INDEX idx_test_runs_created_at ON test_runs(created_at);

                -- Shared trigger function to maintain updated_at
                CREATE OR REPLACE FUNCTION update_updated_at_column()
                RETURNS TRIGGER AS $$
                BEGIN
                    NEW.updated_at = NOW();
                    RETURN NEW;
                END;
                $$ LANGUAGE plpgsql;

                CREATE TRIGGER update_test_runs_updated_at
                    BEFORE UPDATE ON test_runs
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
                DROP TRIGGER IF EXISTS update_test_runs_updated_at ON test_runs;
                DROP TABLE IF EXISTS test_runs CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}

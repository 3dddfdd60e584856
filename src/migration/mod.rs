//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_test_runs;
mod m20260301_000002_create_test_phases;
mod m20260301_000003_create_attachments;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_test_runs::Migration),
            Box::new(m20260301_000002_create_test_phases::Migration),
            Box::new(m20260301_000003_create_attachments::Migration),
        ]
    }
}

//! Attachment entity for SeaORM.
//!
//! An attachment may belong to a test run, a test phase, or neither FK may be
//! set at the schema level; the API layer enforces exactly one parent.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub filename: String,
    pub content_type: Option<String>,
    pub file_size: Option<i64>,
    /// Path to file if stored in the filesystem.
    pub file_path: Option<String>,
    /// Binary payload if stored in the database.
    pub file_data: Option<Vec<u8>>,
    pub description: Option<String>,
    pub test_run_id: Option<i32>,
    pub phase_id: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::test_run::Entity",
        from = "Column::TestRunId",
        to = "super::test_run::Column::Id",
        on_delete = "Cascade"
    )]
    TestRun,
    #[sea_orm(
        belongs_to = "super::test_phase::Entity",
        from = "Column::PhaseId",
        to = "super::test_phase::Column::Id",
        on_delete = "Cascade"
    )]
    TestPhase,
}

impl Related<super::test_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestRun.def()
    }
}

impl Related<super::test_phase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestPhase.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

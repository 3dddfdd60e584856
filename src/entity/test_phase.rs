//! TestPhase entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_phases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub test_run_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub measurements: Option<JsonValue>,
    /// Phase duration in seconds.
    pub duration: Option<f64>,
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
    #[sea_orm(has_many = "super::attachment::Entity")]
    Attachment,
}

impl Related<super::test_run::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestRun.def()
    }
}

impl Related<super::attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

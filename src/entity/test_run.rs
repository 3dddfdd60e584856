//! TestRun entity for SeaORM.

use sea_orm::entity::prelude::*;
use serde_json::Value as JsonValue;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "test_runs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub status: String,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub meta_data: Option<JsonValue>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub results: Option<JsonValue>,
    pub uut_id: Option<String>,
    pub uut_serial: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::test_phase::Entity")]
    TestPhase,
    #[sea_orm(has_many = "super::attachment::Entity")]
    Attachment,
}

impl Related<super::test_phase::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TestPhase.def()
    }
}

impl Related<super::attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

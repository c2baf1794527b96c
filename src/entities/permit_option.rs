//! Permit option entity - A named variant of a permit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Permit option database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "permit_option")]
pub struct Model {
    /// Unique identifier (UUIDv7 string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Permit this option belongs to
    pub permit_id: String,
    /// Variant name (e.g. "season", "day"), if any
    pub name: Option<String>,
    /// Free-form description, if any
    pub description: Option<String>,
}

/// Defines relationships between PermitOption and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each option belongs to one permit
    #[sea_orm(
        belongs_to = "super::permit::Entity",
        from = "Column::PermitId",
        to = "super::permit::Column::Id"
    )]
    Permit,
    /// One option has many sellable periods
    #[sea_orm(has_many = "super::permit_option_period::Entity")]
    Periods,
}

impl Related<super::permit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Permit.def()
    }
}

impl Related<super::permit_option_period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Periods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

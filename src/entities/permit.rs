//! Permit entity - A sellable fishing-rights product scoped to a club.
//!
//! A permit owns options (variants such as "day pass" or "season pass"),
//! each of which owns the sellable periods. Which waters a permit covers is
//! catalog metadata managed outside this crate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Permit database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "permit")]
pub struct Model {
    /// Unique identifier (UUIDv7 string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Club this permit belongs to
    pub club_id: String,
    /// Display name (e.g. "River Aln - Fly Only")
    pub name: String,
    /// Soft delete flag - if true, permit is hidden but data is preserved
    pub is_deleted: bool,
}

/// Defines relationships between Permit and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each permit belongs to one club
    #[sea_orm(
        belongs_to = "super::club::Entity",
        from = "Column::ClubId",
        to = "super::club::Column::Id"
    )]
    Club,
    /// One permit has many options
    #[sea_orm(has_many = "super::permit_option::Entity")]
    Options,
}

impl Related<super::club::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Club.def()
    }
}

impl Related<super::permit_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

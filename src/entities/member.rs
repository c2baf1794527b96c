//! Member entity - A person belonging to a club.
//!
//! A member may be managed by another member (`managed_by`), which allows a
//! guardian to reserve permits and create orders on the managed member's
//! behalf. Member CRUD is handled outside this crate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "member")]
pub struct Model {
    /// Unique identifier (UUIDv7 string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Club this member belongs to
    pub club_id: String,
    /// Full name
    pub name: String,
    /// Contact email, if any
    pub email: Option<String>,
    /// Contact phone, if any
    pub phone: Option<String>,
    /// Member id of the guardian allowed to act for this member, if any
    pub managed_by: Option<String>,
    /// Soft delete flag - if true, member is hidden but data is preserved
    pub is_deleted: bool,
}

/// Defines relationships between Member and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each member belongs to one club
    #[sea_orm(
        belongs_to = "super::club::Entity",
        from = "Column::ClubId",
        to = "super::club::Column::Id"
    )]
    Club,
}

impl Related<super::club::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Club.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Club entity - The tenant every permit, member and order belongs to.
//!
//! Club administration itself (creation, roles, settings) lives outside this
//! crate; the row exists so club scoping can be re-verified before acting.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Club database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "club")]
pub struct Model {
    /// Unique identifier (UUIDv7 string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name of the club
    pub name: String,
}

/// Defines relationships between Club and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One club has many members
    #[sea_orm(has_many = "super::member::Entity")]
    Members,
    /// One club has many permits
    #[sea_orm(has_many = "super::permit::Entity")]
    Permits,
    /// One club has many orders
    #[sea_orm(has_many = "super::club_order::Entity")]
    Orders,
    /// One club has many shop items
    #[sea_orm(has_many = "super::shop_item::Entity")]
    ShopItems,
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::permit::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Permits.def()
    }
}

impl Related<super::club_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::shop_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShopItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

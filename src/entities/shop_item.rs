//! Shop item entity - A non-permit product a club sells.
//!
//! Items flagged `auto_add_on_permit_purchase` are appended to every permit
//! order automatically at their current price (typical use: a mandatory
//! yearbook or catch-log booklet).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Shop item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop_item")]
pub struct Model {
    /// Unique identifier (UUIDv7 string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Club selling this item
    pub club_id: String,
    /// Display name, frozen onto order items at purchase time
    pub name: String,
    /// Current price in cents
    pub price_cents: i64,
    /// Whether the item is currently sellable
    pub is_active: bool,
    /// Whether this item is auto-added to every permit purchase
    pub auto_add_on_permit_purchase: bool,
}

/// Defines relationships between ShopItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each shop item belongs to one club
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

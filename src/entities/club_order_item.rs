//! Club order item entity - One line of an order, with name and prices
//! frozen at purchase time.
//!
//! Permit lines reference the sold `permit_instance` (referenced, not
//! owned); shop item lines keep a reference to the item they snapshot.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum OrderItemType {
    /// A sold permit instance
    #[sea_orm(string_value = "PERMIT")]
    Permit,
    /// A shop item (manual or auto-added)
    #[sea_orm(string_value = "SHOP_ITEM")]
    ShopItem,
    /// The missing-work-duty compensation fee
    #[sea_orm(string_value = "WORK_DUTY_FEE")]
    WorkDutyFee,
}

/// Club order item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "club_order_item")]
pub struct Model {
    /// Unique identifier (UUIDv7 string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Order this line belongs to
    pub club_order_id: String,
    /// Kind of line
    pub item_type: OrderItemType,
    /// Display name frozen at purchase time
    pub name: String,
    /// Original price in cents frozen at purchase time
    pub price_cents: i64,
    /// Discount applied to this line in cents (permit lines only)
    pub discount_cents: i64,
    /// Sold permit instance, when `item_type` is PERMIT
    pub permit_instance_id: Option<String>,
    /// Source shop item, when `item_type` is SHOP_ITEM
    pub shop_item_id: Option<String>,
}

/// Defines relationships between ClubOrderItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line belongs to one order
    #[sea_orm(
        belongs_to = "super::club_order::Entity",
        from = "Column::ClubOrderId",
        to = "super::club_order::Column::Id"
    )]
    Order,
    /// Permit lines reference the sold instance
    #[sea_orm(
        belongs_to = "super::permit_instance::Entity",
        from = "Column::PermitInstanceId",
        to = "super::permit_instance::Column::Id"
    )]
    PermitInstance,
}

impl Related<super::club_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl Related<super::permit_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PermitInstance.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

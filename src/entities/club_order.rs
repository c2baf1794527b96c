//! Club order entity - An immutable-after-creation sale record.
//!
//! `order_number` is club-scoped, year-prefixed and sequential
//! (e.g. `2025-0007`); `(club_id, order_number)` is unique. The buyer may
//! differ from the recipient member for guardian purchases. Totals satisfy
//! `total_cents = subtotal_cents - discount_cents + work_duty_fee_cents`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment/fulfilment state of an order.
///
/// Orders are created `Pending`; the later transitions belong to the
/// payment and fulfilment layers outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum OrderStatus {
    /// Created, awaiting payment
    #[sea_orm(string_value = "PENDING")]
    Pending,
    /// Payment received
    #[sea_orm(string_value = "PAID")]
    Paid,
    /// Goods handed over / shipped
    #[sea_orm(string_value = "FULFILLED")]
    Fulfilled,
    /// Cancelled before fulfilment
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

/// Club order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "club_order")]
pub struct Model {
    /// Unique identifier (UUIDv7 string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Club the order belongs to
    pub club_id: String,
    /// Year-prefixed sequential number, unique within the club
    pub order_number: String,
    /// Recipient member
    pub member_id: String,
    /// Member who executed the purchase (guardian for managed members)
    pub buyer_id: String,
    /// Payment/fulfilment state
    pub status: OrderStatus,
    /// Sum of all permit and shop item lines before discount, in cents
    pub subtotal_cents: i64,
    /// Total discount across permit lines, in cents
    pub discount_cents: i64,
    /// Work duty fee added on top, in cents
    pub work_duty_fee_cents: i64,
    /// `subtotal - discount + work_duty_fee`, in cents
    pub total_cents: i64,
    /// Shipping recipient name snapshot
    pub shipping_name: String,
    /// Shipping street snapshot
    pub shipping_street: String,
    /// Shipping city snapshot
    pub shipping_city: String,
    /// Shipping postal code snapshot
    pub shipping_postal_code: String,
    /// When the order was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between ClubOrder and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one club
    #[sea_orm(
        belongs_to = "super::club::Entity",
        from = "Column::ClubId",
        to = "super::club::Column::Id"
    )]
    Club,
    /// One order exclusively owns its line items
    #[sea_orm(has_many = "super::club_order_item::Entity")]
    Items,
}

impl Related<super::club::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Club.def()
    }
}

impl Related<super::club_order_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

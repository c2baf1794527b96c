//! Permit instance entity - One numbered card within a period; the unit of
//! inventory and the unit of contention.
//!
//! Lifecycle: `available -> reserved -> sold` on the normal path,
//! `available -> reserved -> available` on expiry/release, `-> cancelled`
//! administratively. Sold and cancelled are terminal for this crate.
//! Invariant: `reserved_by` and `reserved_at` are both set or both null;
//! `reserved` status implies both set, `available` implies both null.
//! `(period_id, permit_number)` is unique.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a numbered permit card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum InstanceStatus {
    /// In stock, claimable by any buyer
    #[sea_orm(string_value = "available")]
    Available,
    /// Soft-claimed by a buyer, pending checkout or expiry
    #[sea_orm(string_value = "reserved")]
    Reserved,
    /// Converted into an order line; terminal
    #[sea_orm(string_value = "sold")]
    Sold,
    /// Withdrawn administratively; terminal
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Permit instance database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "permit_instance")]
pub struct Model {
    /// Unique identifier (UUIDv7 string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Period this card belongs to
    pub permit_option_period_id: String,
    /// Physical card number, unique within the period
    pub permit_number: i64,
    /// Current lifecycle state
    pub status: InstanceStatus,
    /// Member id of the buyer holding the reservation, if reserved
    pub reserved_by: Option<String>,
    /// When the reservation was taken, if reserved
    pub reserved_at: Option<DateTimeUtc>,
    /// Recipient member, populated on sale
    pub owner_member_id: Option<String>,
    /// Recipient name snapshot, populated on sale
    pub owner_name: Option<String>,
    /// Recipient email snapshot, populated on sale
    pub owner_email: Option<String>,
    /// Recipient phone snapshot, populated on sale
    pub owner_phone: Option<String>,
    /// When the card was sold
    pub sold_at: Option<DateTimeUtc>,
    /// When the card was cancelled administratively
    pub cancelled_at: Option<DateTimeUtc>,
    /// External payment reference, set by administration
    pub payment_reference: Option<String>,
    /// Amount actually paid in cents, set by administration
    pub paid_cents: Option<i64>,
    /// Free-form administrative notes
    pub notes: Option<String>,
}

/// Defines relationships between PermitInstance and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each instance belongs to one period
    #[sea_orm(
        belongs_to = "super::permit_option_period::Entity",
        from = "Column::PermitOptionPeriodId",
        to = "super::permit_option_period::Column::Id"
    )]
    Period,
}

impl Related<super::permit_option_period::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Period.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Permit option period entity - A time-bounded, priced, numbered-range
//! sellable window for a permit option.
//!
//! The inclusive range `[permit_number_start, permit_number_end]` defines
//! how many physical cards exist for the period; the instance generator
//! materializes one `permit_instance` row per number. After a range shrink
//! the actual instance population may keep sold/reserved numbers outside
//! the advertised range - callers must tolerate that divergence.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Permit option period database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "permit_option_period")]
pub struct Model {
    /// Unique identifier (UUIDv7 string)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Option this period belongs to
    pub permit_option_id: String,
    /// First day the permit is valid
    pub valid_from: Date,
    /// Last day the permit is valid
    pub valid_to: Date,
    /// Price in cents for one permit in this period
    pub price_cents: i64,
    /// First permit number in the range (inclusive)
    pub permit_number_start: i64,
    /// Last permit number in the range (inclusive, >= start)
    pub permit_number_end: i64,
}

/// Defines relationships between PermitOptionPeriod and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each period belongs to one option
    #[sea_orm(
        belongs_to = "super::permit_option::Entity",
        from = "Column::PermitOptionId",
        to = "super::permit_option::Column::Id"
    )]
    Option,
    /// One period owns many numbered instances
    #[sea_orm(has_many = "super::permit_instance::Entity")]
    Instances,
}

impl Related<super::permit_option::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Option.def()
    }
}

impl Related<super::permit_instance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Instances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

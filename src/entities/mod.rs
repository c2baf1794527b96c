//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod club;
pub mod club_order;
pub mod club_order_item;
pub mod member;
pub mod permit;
pub mod permit_instance;
pub mod permit_option;
pub mod permit_option_period;
pub mod shop_item;

// Re-export specific types to avoid conflicts
pub use club::{Column as ClubColumn, Entity as Club, Model as ClubModel};
pub use club_order::{Column as ClubOrderColumn, Entity as ClubOrder, Model as ClubOrderModel};
pub use club_order_item::{
    Column as ClubOrderItemColumn, Entity as ClubOrderItem, Model as ClubOrderItemModel,
};
pub use member::{Column as MemberColumn, Entity as Member, Model as MemberModel};
pub use permit::{Column as PermitColumn, Entity as Permit, Model as PermitModel};
pub use permit_instance::{
    Column as PermitInstanceColumn, Entity as PermitInstance, Model as PermitInstanceModel,
};
pub use permit_option::{
    Column as PermitOptionColumn, Entity as PermitOption, Model as PermitOptionModel,
};
pub use permit_option_period::{
    Column as PermitOptionPeriodColumn, Entity as PermitOptionPeriod,
    Model as PermitOptionPeriodModel,
};
pub use shop_item::{Column as ShopItemColumn, Entity as ShopItem, Model as ShopItemModel};

/// Generates a fresh row identifier.
///
/// UUIDv7 strings are time-ordered, so identifiers sort lexicographically
/// in creation order - the contract the rest of the system assumes.
#[must_use]
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

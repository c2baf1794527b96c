//! Database configuration module for `PermitDesk`.
//!
//! This module handles `SQLite` database connection and table creation using
//! `SeaORM`. Tables are generated from the entity definitions via
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs without manual SQL. The two composite unique constraints the
//! derive cannot express - `(permit_option_period_id, permit_number)` and
//! `(club_id, order_number)` - are created as explicit unique indexes; the
//! order-number index is what makes concurrent checkout numbering safe.

use crate::entities::{
    Club, ClubOrder, ClubOrderItem, Member, Permit, PermitInstance, PermitOption,
    PermitOptionPeriod, ShopItem, club_order, permit_instance,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Establishes a connection to the database named by `database_url`.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all tables and unique indexes from the entity definitions.
///
/// Parent tables are created before the tables that reference them so the
/// generated foreign keys resolve. Everything is `IF NOT EXISTS`, so calling
/// this on an already-initialized database file is a no-op.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        schema.create_table_from_entity(Club),
        schema.create_table_from_entity(Member),
        schema.create_table_from_entity(ShopItem),
        schema.create_table_from_entity(Permit),
        schema.create_table_from_entity(PermitOption),
        schema.create_table_from_entity(PermitOptionPeriod),
        schema.create_table_from_entity(PermitInstance),
        schema.create_table_from_entity(ClubOrder),
        schema.create_table_from_entity(ClubOrderItem),
    ];
    for mut table in tables {
        table.if_not_exists();
        db.execute(builder.build(&table)).await?;
    }

    // One physical card number per period
    let instance_number_index = Index::create()
        .name("uniq_permit_instance_period_number")
        .table(PermitInstance)
        .col(permit_instance::Column::PermitOptionPeriodId)
        .col(permit_instance::Column::PermitNumber)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&instance_number_index)).await?;

    // One order number per club; backs the numbering retry loop
    let order_number_index = Index::create()
        .name("uniq_club_order_number")
        .table(ClubOrder)
        .col(club_order::Column::ClubId)
        .col(club_order::Column::OrderNumber)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&order_number_index)).await?;

    Ok(())
}

//! Shared test utilities for `PermitDesk`.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test fixtures with sensible defaults. Club,
//! member and shop-item administration is out of scope for this crate, so
//! fixtures insert those rows directly.

use crate::{
    config::database::create_tables,
    core::{catalog, orders},
    entities::{
        PermitInstance, club, member, new_id, permit, permit_instance,
        permit_instance::InstanceStatus, permit_option, permit_option_period, shop_item,
    },
    errors::Result,
};
use chrono::{Datelike, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

/// Creates an in-memory `SQLite` database with all tables initialized.
///
/// The pool is capped at one connection so every query and transaction in a
/// test sees the same in-memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = sea_orm::Database::connect(options).await?;
    create_tables(&db).await?;
    Ok(db)
}

/// A fully wired catalog: one club, one member, one permit with one option
/// and one sellable period (instances included).
#[derive(Debug, Clone)]
pub struct PeriodFixture {
    /// The club everything belongs to
    pub club: club::Model,
    /// A plain member of the club ("Edith Salmon")
    pub member: member::Model,
    /// The permit ("River Aln")
    pub permit: permit::Model,
    /// Its option ("season")
    pub option: permit_option::Model,
    /// The sellable period
    pub period: permit_option_period::Model,
}

/// Convenience date constructor for fixtures.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A shipping address snapshot for order tests.
#[must_use]
pub fn shipping_address() -> orders::ShippingAddress {
    orders::ShippingAddress {
        name: "Edith Salmon".to_string(),
        street: "Bridge Street 12".to_string(),
        city: "Alnwick".to_string(),
        postal_code: "NE66 1HW".to_string(),
    }
}

/// Creates a test club.
pub async fn create_test_club(db: &DatabaseConnection, name: &str) -> Result<club::Model> {
    club::ActiveModel {
        id: Set(new_id()),
        name: Set(name.to_string()),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a test member of a club, managed by nobody.
pub async fn create_test_member(
    db: &DatabaseConnection,
    club_id: &str,
    name: &str,
) -> Result<member::Model> {
    member::ActiveModel {
        id: Set(new_id()),
        club_id: Set(club_id.to_string()),
        name: Set(name.to_string()),
        email: Set(Some(format!(
            "{}@example.org",
            name.to_lowercase().replace(' ', ".")
        ))),
        phone: Set(None),
        managed_by: Set(None),
        is_deleted: Set(false),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a member managed by a guardian.
pub async fn create_managed_member(
    db: &DatabaseConnection,
    club_id: &str,
    name: &str,
    guardian_id: &str,
) -> Result<member::Model> {
    member::ActiveModel {
        id: Set(new_id()),
        club_id: Set(club_id.to_string()),
        name: Set(name.to_string()),
        email: Set(None),
        phone: Set(None),
        managed_by: Set(Some(guardian_id.to_string())),
        is_deleted: Set(false),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates `count` numbered test members.
pub async fn create_test_members(
    db: &DatabaseConnection,
    club_id: &str,
    count: usize,
) -> Result<Vec<member::Model>> {
    let mut members = Vec::with_capacity(count);
    for index in 0..count {
        members.push(create_test_member(db, club_id, &format!("Member {index}")).await?);
    }
    Ok(members)
}

/// Creates a permit with a single named option.
pub async fn create_test_permit_with_option(
    db: &DatabaseConnection,
    club_id: &str,
    permit_name: &str,
    option_name: &str,
) -> Result<(permit::Model, permit_option::Model)> {
    let permit = permit::ActiveModel {
        id: Set(new_id()),
        club_id: Set(club_id.to_string()),
        name: Set(permit_name.to_string()),
        is_deleted: Set(false),
    }
    .insert(db)
    .await?;

    let option = permit_option::ActiveModel {
        id: Set(new_id()),
        permit_id: Set(permit.id.clone()),
        name: Set(Some(option_name.to_string())),
        description: Set(None),
    }
    .insert(db)
    .await?;

    Ok((permit, option))
}

/// Creates a current-year period under an option, instances included,
/// priced at 10000 cents.
pub async fn create_period_for_option(
    db: &DatabaseConnection,
    option_id: &str,
    number_start: i64,
    number_end: i64,
) -> Result<permit_option_period::Model> {
    let year = Utc::now().year();
    catalog::create_period(
        db,
        option_id,
        date(year, 1, 1),
        date(year, 12, 31),
        10_000,
        number_start,
        number_end,
    )
    .await
}

/// Creates a period row with no instances at all (an exhausted period).
pub async fn create_empty_period(
    db: &DatabaseConnection,
    option_id: &str,
) -> Result<permit_option_period::Model> {
    let year = Utc::now().year();
    permit_option_period::ActiveModel {
        id: Set(new_id()),
        permit_option_id: Set(option_id.to_string()),
        valid_from: Set(date(year, 1, 1)),
        valid_to: Set(date(year, 12, 31)),
        price_cents: Set(10_000),
        permit_number_start: Set(1),
        permit_number_end: Set(1),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a shop item; `auto_add` items join every permit order.
pub async fn create_test_shop_item(
    db: &DatabaseConnection,
    club_id: &str,
    name: &str,
    price_cents: i64,
    auto_add: bool,
) -> Result<shop_item::Model> {
    shop_item::ActiveModel {
        id: Set(new_id()),
        club_id: Set(club_id.to_string()),
        name: Set(name.to_string()),
        price_cents: Set(price_cents),
        is_active: Set(true),
        auto_add_on_permit_purchase: Set(auto_add),
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Sets up the standard environment: club, member and a three-card period.
pub async fn setup_with_period() -> Result<(DatabaseConnection, PeriodFixture)> {
    setup_with_period_custom(1, 3, 10_000).await
}

/// [`setup_with_period`] with a custom permit number range.
pub async fn setup_with_period_range(
    number_start: i64,
    number_end: i64,
) -> Result<(DatabaseConnection, PeriodFixture)> {
    setup_with_period_custom(number_start, number_end, 10_000).await
}

/// [`setup_with_period`] with a custom period price.
pub async fn setup_with_period_price(
    price_cents: i64,
) -> Result<(DatabaseConnection, PeriodFixture)> {
    setup_with_period_custom(1, 3, price_cents).await
}

async fn setup_with_period_custom(
    number_start: i64,
    number_end: i64,
    price_cents: i64,
) -> Result<(DatabaseConnection, PeriodFixture)> {
    let db = setup_test_db().await?;
    let club = create_test_club(&db, "Alnwick AC").await?;
    let member = create_test_member(&db, &club.id, "Edith Salmon").await?;
    let (permit, option) =
        create_test_permit_with_option(&db, &club.id, "River Aln", "season").await?;
    let year = Utc::now().year();
    let period = catalog::create_period(
        &db,
        &option.id,
        date(year, 1, 1),
        date(year, 12, 31),
        price_cents,
        number_start,
        number_end,
    )
    .await?;

    let fixture = PeriodFixture {
        club,
        member,
        permit,
        option,
        period,
    };
    Ok((db, fixture))
}

/// Fetches a period's instances ordered by permit number.
pub async fn fetch_instances(
    db: &DatabaseConnection,
    period_id: &str,
) -> Result<Vec<permit_instance::Model>> {
    PermitInstance::find()
        .filter(permit_instance::Column::PermitOptionPeriodId.eq(period_id))
        .order_by_asc(permit_instance::Column::PermitNumber)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Forces an instance into a status directly, bypassing the reservation
/// flow. Used to stage sold/cancelled history.
pub async fn force_instance_status(
    db: &DatabaseConnection,
    period_id: &str,
    permit_number: i64,
    status: InstanceStatus,
) -> Result<()> {
    PermitInstance::update_many()
        .set(permit_instance::ActiveModel {
            status: Set(status),
            ..Default::default()
        })
        .filter(permit_instance::Column::PermitOptionPeriodId.eq(period_id))
        .filter(permit_instance::Column::PermitNumber.eq(permit_number))
        .exec(db)
        .await?;
    Ok(())
}

/// Rewinds `reserved_at` for everything a buyer holds, simulating the
/// passage of `minutes` without waiting.
pub async fn backdate_reservations(
    db: &DatabaseConnection,
    buyer_id: &str,
    minutes: i64,
) -> Result<()> {
    let past = Utc::now() - Duration::minutes(minutes);
    PermitInstance::update_many()
        .set(permit_instance::ActiveModel {
            reserved_at: Set(Some(past)),
            ..Default::default()
        })
        .filter(permit_instance::Column::ReservedBy.eq(buyer_id))
        .exec(db)
        .await?;
    Ok(())
}

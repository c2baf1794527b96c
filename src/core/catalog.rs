//! Permit catalog operations - the permit -> option -> period hierarchy.
//!
//! Period creation and range edits keep the instance population in step via
//! [`crate::core::instances`], inside the same transaction as the period
//! row itself. Lookup re-verifies the club -> permit -> option -> period
//! chain top-down before anything acts on a period.

use crate::{
    core::instances::{self, SyncOutcome},
    entities::{
        Permit, PermitOption, PermitOptionPeriod, new_id, permit, permit_option,
        permit_option_period,
    },
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait, prelude::*};
use tracing::info;

/// A period together with its resolved option and permit.
#[derive(Debug, Clone)]
pub struct PeriodContext {
    /// The permit at the top of the chain
    pub permit: permit::Model,
    /// The option the period belongs to
    pub option: permit_option::Model,
    /// The period itself
    pub period: permit_option_period::Model,
}

impl PeriodContext {
    /// Human-readable label used in error messages and order lines,
    /// e.g. `River Aln (season)`.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.option.name {
            Some(option_name) => format!("{} ({option_name})", self.permit.name),
            None => self.permit.name.clone(),
        }
    }
}

/// Resolves a period for a club, re-verifying the ownership chain top-down.
///
/// A period whose permit belongs to a different club (or is deleted) is
/// reported as not found, naming the permit and option so the caller can
/// tell the user what was rejected.
pub async fn find_period_for_club<C>(
    db: &C,
    club_id: &str,
    period_id: &str,
) -> Result<PeriodContext>
where
    C: ConnectionTrait,
{
    let period = PermitOptionPeriod::find_by_id(period_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(format!("permit period {period_id}")))?;

    let option = PermitOption::find_by_id(&period.permit_option_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            Error::not_found(format!("permit option {}", period.permit_option_id))
        })?;

    let permit = Permit::find_by_id(&option.permit_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found(format!("permit {}", option.permit_id)))?;

    let context = PeriodContext {
        permit,
        option,
        period,
    };
    if context.permit.club_id != club_id || context.permit.is_deleted {
        return Err(Error::not_found(format!(
            "permit {} is not offered by this club",
            context.label()
        )));
    }

    Ok(context)
}

/// Creates a sellable period under an option and materializes its numbered
/// instances, all in one transaction.
pub async fn create_period(
    db: &DatabaseConnection,
    option_id: &str,
    valid_from: Date,
    valid_to: Date,
    price_cents: i64,
    number_start: i64,
    number_end: i64,
) -> Result<permit_option_period::Model> {
    if number_start > number_end {
        return Err(Error::invalid(format!(
            "Permit number range {number_start}-{number_end} is inverted"
        )));
    }
    if valid_to < valid_from {
        return Err(Error::invalid(format!(
            "Validity window {valid_from} to {valid_to} is inverted"
        )));
    }

    let txn = db.begin().await?;

    PermitOption::find_by_id(option_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found(format!("permit option {option_id}")))?;

    let period = permit_option_period::ActiveModel {
        id: Set(new_id()),
        permit_option_id: Set(option_id.to_string()),
        valid_from: Set(valid_from),
        valid_to: Set(valid_to),
        price_cents: Set(price_cents),
        permit_number_start: Set(number_start),
        permit_number_end: Set(number_end),
    }
    .insert(&txn)
    .await?;

    instances::generate(&txn, &period.id, number_start, number_end).await?;

    txn.commit().await?;
    Ok(period)
}

/// Updates a period's number range and synchronizes its instance rows in
/// the same transaction.
pub async fn update_period_range(
    db: &DatabaseConnection,
    period_id: &str,
    new_start: i64,
    new_end: i64,
) -> Result<SyncOutcome> {
    if new_start > new_end {
        return Err(Error::invalid(format!(
            "Permit number range {new_start}-{new_end} is inverted"
        )));
    }

    let txn = db.begin().await?;

    let period = PermitOptionPeriod::find_by_id(period_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found(format!("permit period {period_id}")))?;

    let mut active: permit_option_period::ActiveModel = period.into();
    active.permit_number_start = Set(new_start);
    active.permit_number_end = Set(new_end);
    active.update(&txn).await?;

    let outcome = instances::sync(&txn, period_id, new_start, new_end).await?;

    txn.commit().await?;

    info!(
        period_id,
        new_start,
        new_end,
        added = outcome.added,
        deleted = outcome.deleted,
        "permit period range updated"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::permit_instance::InstanceStatus;
    use crate::test_utils::{self, fetch_instances};

    #[tokio::test]
    async fn test_create_period_generates_instances() -> Result<()> {
        let db = test_utils::setup_test_db().await?;
        let club = test_utils::create_test_club(&db, "Alnwick AC").await?;
        let (_, option) =
            test_utils::create_test_permit_with_option(&db, &club.id, "River Aln", "season")
                .await?;

        let period = create_period(
            &db,
            &option.id,
            test_utils::date(2025, 1, 1),
            test_utils::date(2025, 12, 31),
            10_000,
            1,
            20,
        )
        .await?;

        assert_eq!(period.permit_number_start, 1);
        assert_eq!(period.permit_number_end, 20);
        assert_eq!(fetch_instances(&db, &period.id).await?.len(), 20);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_period_unknown_option() -> Result<()> {
        let db = test_utils::setup_test_db().await?;

        let result = create_period(
            &db,
            "missing-option",
            test_utils::date(2025, 1, 1),
            test_utils::date(2025, 12, 31),
            10_000,
            1,
            5,
        )
        .await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { what: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_period_rejects_inverted_dates() -> Result<()> {
        let db = test_utils::setup_test_db().await?;
        let club = test_utils::create_test_club(&db, "Alnwick AC").await?;
        let (_, option) =
            test_utils::create_test_permit_with_option(&db, &club.id, "River Aln", "season")
                .await?;

        let result = create_period(
            &db,
            &option.id,
            test_utils::date(2025, 12, 31),
            test_utils::date(2025, 1, 1),
            10_000,
            1,
            5,
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::InvalidRequest { message: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_period_range_syncs_instances() -> Result<()> {
        let (db, fixture) = test_utils::setup_with_period().await?;

        let outcome = update_period_range(&db, &fixture.period.id, 1, 10).await?;
        assert_eq!(outcome.added, 7); // fixture period starts with 1-3
        assert_eq!(outcome.deleted, 0);

        let period = PermitOptionPeriod::find_by_id(&fixture.period.id)
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(period.permit_number_end, 10);
        assert_eq!(fetch_instances(&db, &fixture.period.id).await?.len(), 10);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_period_range_unknown_period() -> Result<()> {
        let db = test_utils::setup_test_db().await?;

        let result = update_period_range(&db, "missing-period", 1, 5).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { what: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_find_period_for_club_resolves_chain() -> Result<()> {
        let (db, fixture) = test_utils::setup_with_period().await?;

        let context = find_period_for_club(&db, &fixture.club.id, &fixture.period.id).await?;
        assert_eq!(context.permit.id, fixture.permit.id);
        assert_eq!(context.option.id, fixture.option.id);
        assert_eq!(context.period.id, fixture.period.id);
        assert_eq!(context.label(), "River Aln (season)");

        Ok(())
    }

    #[tokio::test]
    async fn test_find_period_for_club_rejects_foreign_club() -> Result<()> {
        let (db, fixture) = test_utils::setup_with_period().await?;
        let other_club = test_utils::create_test_club(&db, "Coquet AC").await?;

        let result = find_period_for_club(&db, &other_club.id, &fixture.period.id).await;
        match result.unwrap_err() {
            Error::NotFound { what } => assert!(what.contains("River Aln")),
            other => panic!("expected NotFound, got {other:?}"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_find_period_for_club_unknown_period() -> Result<()> {
        let (db, fixture) = test_utils::setup_with_period().await?;

        let result = find_period_for_club(&db, &fixture.club.id, "missing").await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { what: _ }));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_range_then_sell_then_shrink() -> Result<()> {
        let (db, fixture) = test_utils::setup_with_period().await?;
        update_period_range(&db, &fixture.period.id, 1, 10).await?;
        test_utils::force_instance_status(&db, &fixture.period.id, 7, InstanceStatus::Sold)
            .await?;

        let outcome = update_period_range(&db, &fixture.period.id, 1, 5).await?;
        assert_eq!(outcome.deleted, 4); // 6, 8, 9, 10; sold 7 survives

        let numbers: Vec<i64> = fetch_instances(&db, &fixture.period.id)
            .await?
            .iter()
            .map(|i| i.permit_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 7]);

        Ok(())
    }
}

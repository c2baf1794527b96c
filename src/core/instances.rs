//! Permit instance generation and range synchronization.
//!
//! A period's inclusive number range `[start, end]` is materialized as one
//! row per number. `generate` does the initial fill at period creation;
//! `sync` reconciles the row set whenever an admin edits the range. Both
//! run on any [`ConnectionTrait`] so the caller can keep them inside the
//! transaction that created or updated the period - a partial fill must
//! never be observable next to the new range metadata.

use crate::{
    entities::{PermitInstance, new_id, permit_instance, permit_instance::InstanceStatus},
    errors::{Error, Result},
};
use sea_orm::{ConnectionTrait, Set, prelude::*};
use std::collections::BTreeSet;

/// Counts returned by [`sync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Instances created for numbers newly inside the range
    pub added: u64,
    /// `available` instances deleted for numbers now outside the range
    pub deleted: u64,
}

/// A fresh `available` instance with all reservation and owner fields unset.
fn blank_instance(period_id: &str, number: i64) -> permit_instance::ActiveModel {
    permit_instance::ActiveModel {
        id: Set(new_id()),
        permit_option_period_id: Set(period_id.to_string()),
        permit_number: Set(number),
        status: Set(InstanceStatus::Available),
        reserved_by: Set(None),
        reserved_at: Set(None),
        owner_member_id: Set(None),
        owner_name: Set(None),
        owner_email: Set(None),
        owner_phone: Set(None),
        sold_at: Set(None),
        cancelled_at: Set(None),
        payment_reference: Set(None),
        paid_cents: Set(None),
        notes: Set(None),
    }
}

/// Creates one `available` instance for every number in
/// `[number_start, number_end]`.
///
/// Used once at period creation; the caller guarantees the period has no
/// instances yet. Returns the number of rows inserted.
pub async fn generate<C>(db: &C, period_id: &str, number_start: i64, number_end: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    if number_start > number_end {
        return Err(Error::invalid(format!(
            "Permit number range {number_start}-{number_end} is inverted"
        )));
    }

    let rows: Vec<permit_instance::ActiveModel> = (number_start..=number_end)
        .map(|number| blank_instance(period_id, number))
        .collect();
    let count = rows.len() as u64;
    PermitInstance::insert_many(rows).exec(db).await?;

    Ok(count)
}

/// Reconciles a period's instance rows with an edited range.
///
/// Numbers inside `[new_start, new_end]` that have no instance get a new
/// `available` one. Existing numbers outside the range are deleted only
/// while their status is exactly `available`; reserved, sold and cancelled
/// instances are left untouched so a range shrink can never destroy sales
/// history. The range metadata and the instance population may therefore
/// diverge after a shrink - callers must tolerate that.
pub async fn sync<C>(db: &C, period_id: &str, new_start: i64, new_end: i64) -> Result<SyncOutcome>
where
    C: ConnectionTrait,
{
    if new_start > new_end {
        return Err(Error::invalid(format!(
            "Permit number range {new_start}-{new_end} is inverted"
        )));
    }

    let existing = PermitInstance::find()
        .filter(permit_instance::Column::PermitOptionPeriodId.eq(period_id))
        .all(db)
        .await?;
    let existing_numbers: BTreeSet<i64> = existing.iter().map(|i| i.permit_number).collect();

    let additions: Vec<permit_instance::ActiveModel> = (new_start..=new_end)
        .filter(|number| !existing_numbers.contains(number))
        .map(|number| blank_instance(period_id, number))
        .collect();
    let added = additions.len() as u64;
    if !additions.is_empty() {
        PermitInstance::insert_many(additions).exec(db).await?;
    }

    let doomed: Vec<String> = existing
        .iter()
        .filter(|i| {
            (i.permit_number < new_start || i.permit_number > new_end)
                && i.status == InstanceStatus::Available
        })
        .map(|i| i.id.clone())
        .collect();
    let deleted = if doomed.is_empty() {
        0
    } else {
        PermitInstance::delete_many()
            .filter(permit_instance::Column::Id.is_in(doomed))
            .exec(db)
            .await?
            .rows_affected
    };

    Ok(SyncOutcome { added, deleted })
}

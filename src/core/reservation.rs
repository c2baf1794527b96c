//! Atomic reservation of available permit instances.
//!
//! A reservation is a soft, time-boxed claim stored on the instance row
//! itself (`reserved_by`, `reserved_at`), so it survives server restarts
//! and can be reclaimed externally by the sweeper. A buyer holds
//! reservations for exactly one in-progress checkout at a time: starting a
//! new reservation releases everything the buyer had reserved before.
//!
//! Claiming uses a compare-and-swap update per instance instead of a
//! blocking locking read: pick a candidate, `UPDATE ... WHERE id = ? AND
//! status = 'available'`, and move on to the next candidate when the row
//! count comes back zero because a concurrent buyer got there first. No
//! caller ever blocks on another and no instance is ever double-assigned.

use crate::{
    core::{access, catalog},
    entities::{PermitInstance, permit_instance, permit_instance::InstanceStatus},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::debug;

/// How long a buyer may hold a reservation before the sweeper reclaims it.
/// Shared with [`crate::core::sweeper`].
pub const RESERVATION_TTL_MINUTES: i64 = 5;

/// The reservation window as a [`chrono::Duration`].
#[must_use]
pub fn reservation_ttl() -> Duration {
    Duration::minutes(RESERVATION_TTL_MINUTES)
}

/// One successfully reserved permit instance.
#[derive(Debug, Clone)]
pub struct ReservedPermit {
    /// The claimed instance
    pub permit_instance_id: String,
    /// Permit at the top of the catalog chain
    pub permit_id: String,
    /// Permit display name
    pub permit_name: String,
    /// Option the period belongs to
    pub option_id: String,
    /// Option display name, if any
    pub option_name: Option<String>,
    /// The requested period
    pub period_id: String,
    /// Period price in cents
    pub price_cents: i64,
}

/// Result of a successful [`reserve`] call.
#[derive(Debug, Clone)]
pub struct ReservationOutcome {
    /// One entry per requested period, in request order
    pub permits: Vec<ReservedPermit>,
    /// When the claims were taken
    pub reserved_at: DateTime<Utc>,
    /// When the sweeper becomes entitled to reclaim them
    pub expires_at: DateTime<Utc>,
}

/// Reserves one available instance per requested period for a buyer acting
/// for themselves or a managed member.
///
/// Releases the buyer's previous reservations first, then claims in request
/// order. The call is all-or-nothing: a period with no claimable instance
/// aborts the claim transaction, rolling back the claims made earlier in
/// the same call, and reports a conflict naming the exhausted permit.
pub async fn reserve(
    db: &DatabaseConnection,
    club_id: &str,
    buyer_id: &str,
    member_id: &str,
    period_ids: &[String],
) -> Result<ReservationOutcome> {
    if period_ids.is_empty() {
        return Err(Error::invalid("No permit periods requested"));
    }

    access::authorize_purchase(db, club_id, buyer_id, member_id).await?;

    // Release-first, committed separately: even if the claims below fail,
    // the buyer's previous checkout stays released.
    let txn = db.begin().await?;
    let released = release_all_for_buyer(&txn, buyer_id).await?;
    txn.commit().await?;
    if released > 0 {
        debug!(buyer_id, released, "released previous reservations");
    }

    let reserved_at = Utc::now();
    let txn = db.begin().await?;
    let mut permits = Vec::with_capacity(period_ids.len());
    for period_id in period_ids {
        let context = catalog::find_period_for_club(&txn, club_id, period_id).await?;
        let Some(instance) = claim_one_available(&txn, period_id, buyer_id, reserved_at).await?
        else {
            // Dropping the transaction rolls back this call's earlier claims.
            return Err(Error::conflict(format!(
                "No permits left for {}",
                context.label()
            )));
        };
        permits.push(ReservedPermit {
            permit_instance_id: instance.id,
            permit_id: context.permit.id,
            permit_name: context.permit.name,
            option_id: context.option.id,
            option_name: context.option.name,
            period_id: context.period.id,
            price_cents: context.period.price_cents,
        });
    }
    txn.commit().await?;

    Ok(ReservationOutcome {
        permits,
        reserved_at,
        expires_at: reserved_at + reservation_ttl(),
    })
}

/// Releases every instance currently reserved by a buyer, club-wide.
/// Returns the number of released rows.
pub async fn release_all_for_buyer<C>(db: &C, buyer_id: &str) -> Result<u64>
where
    C: ConnectionTrait,
{
    let result = PermitInstance::update_many()
        .set(permit_instance::ActiveModel {
            status: Set(InstanceStatus::Available),
            reserved_by: Set(None),
            reserved_at: Set(None),
            ..Default::default()
        })
        .filter(permit_instance::Column::Status.eq(InstanceStatus::Reserved))
        .filter(permit_instance::Column::ReservedBy.eq(buyer_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Claims one available instance of a period for a buyer.
///
/// Candidates are taken lowest permit number first. A candidate whose
/// compare-and-swap update affects zero rows was claimed concurrently and
/// is simply skipped; the loop terminates because every miss means the
/// available pool shrank. `None` means the period is exhausted.
async fn claim_one_available<C>(
    db: &C,
    period_id: &str,
    buyer_id: &str,
    reserved_at: DateTime<Utc>,
) -> Result<Option<permit_instance::Model>>
where
    C: ConnectionTrait,
{
    loop {
        let candidate = PermitInstance::find()
            .filter(permit_instance::Column::PermitOptionPeriodId.eq(period_id))
            .filter(permit_instance::Column::Status.eq(InstanceStatus::Available))
            .order_by_asc(permit_instance::Column::PermitNumber)
            .one(db)
            .await?;
        let Some(candidate) = candidate else {
            return Ok(None);
        };

        let swapped = PermitInstance::update_many()
            .set(permit_instance::ActiveModel {
                status: Set(InstanceStatus::Reserved),
                reserved_by: Set(Some(buyer_id.to_string())),
                reserved_at: Set(Some(reserved_at)),
                ..Default::default()
            })
            .filter(permit_instance::Column::Id.eq(candidate.id.as_str()))
            .filter(permit_instance::Column::Status.eq(InstanceStatus::Available))
            .exec(db)
            .await?;

        if swapped.rows_affected == 1 {
            let claimed = PermitInstance::find_by_id(&candidate.id)
                .one(db)
                .await?
                .ok_or_else(|| Error::not_found(format!("permit instance {}", candidate.id)))?;
            return Ok(Some(claimed));
        }
        // Lost the race for this candidate; try the next number.
    }
}

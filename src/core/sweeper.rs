//! Background release of expired reservations.
//!
//! A reservation is only a soft claim; when a buyer abandons checkout the
//! claim must flow back into the pool without their involvement. Each sweep
//! is one bulk update, idempotent and safe to overlap with itself: a row
//! released by one run simply no longer matches the next. Sweep failures
//! are logged and swallowed - a failed cycle is retried on the next tick
//! and never brings down the host process.

use crate::{
    core::reservation::reservation_ttl,
    entities::{PermitInstance, permit_instance, permit_instance::InstanceStatus},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use tracing::{error, info};

/// Releases every reservation whose window has elapsed.
/// Returns the number of instances flipped back to `available`.
pub async fn release_expired(db: &DatabaseConnection) -> Result<u64> {
    let cutoff = Utc::now() - reservation_ttl();

    let result = PermitInstance::update_many()
        .set(permit_instance::ActiveModel {
            status: Set(InstanceStatus::Available),
            reserved_by: Set(None),
            reserved_at: Set(None),
            ..Default::default()
        })
        .filter(permit_instance::Column::Status.eq(InstanceStatus::Reserved))
        .filter(permit_instance::Column::ReservedBy.is_not_null())
        .filter(permit_instance::Column::ReservedAt.lt(cutoff))
        .exec(db)
        .await?;

    Ok(result.rows_affected)
}

/// Runs [`release_expired`] forever on a fixed cadence.
pub async fn run(db: DatabaseConnection, interval: std::time::Duration) {
    info!(interval_secs = interval.as_secs(), "reservation sweeper started");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match release_expired(&db).await {
            Ok(0) => {}
            Ok(released) => info!(released, "released expired reservations"),
            Err(e) => error!("reservation sweep failed: {e}"),
        }
    }
}

//! Order finalization - converts a buyer's live reservations into an
//! immutable order with priced line items.
//!
//! The finalizer re-proves every reservation (right instance, right state,
//! right buyer), prices the permit lines with the member's discounts,
//! appends the work-duty fee and the club's auto-add shop items, allocates
//! the next club-scoped order number and flips the instances to `sold` -
//! all inside one transaction, so a sold instance without an order row (or
//! the reverse) can never be observed. Discount percentages and the
//! work-duty fee are computed by collaborators outside this crate and
//! arrive as validated inputs.

use crate::{
    core::{access, catalog},
    entities::{
        ClubOrder, PermitInstance, ShopItem, club_order, club_order::OrderStatus, club_order_item,
        club_order_item::OrderItemType, new_id, permit_instance,
        permit_instance::InstanceStatus, shop_item,
    },
    errors::{Error, Result},
};
use chrono::{Datelike, Utc};
use std::collections::HashSet;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DatabaseTransaction, Set, SqlErr, TransactionTrait,
    prelude::*,
};
use tracing::info;

/// Bounded retries for order-number collisions under concurrent checkouts.
const ORDER_NUMBER_ATTEMPTS: u32 = 3;

/// A member's discount for one permit option, as computed externally.
#[derive(Debug, Clone)]
pub struct MemberDiscount {
    /// Option the discount applies to
    pub permit_option_id: String,
    /// Whole-number percentage in `0..=100`
    pub discount_percent: i64,
}

/// Externally computed missing-work-duty fee.
#[derive(Debug, Clone)]
pub struct WorkDutyFee {
    /// Number of unperformed duties
    pub missing: u32,
    /// Fee per missing duty in cents
    pub fee_per_duty_cents: i64,
    /// Total fee in cents; the order carries this amount
    pub total_fee_cents: i64,
}

/// Shipping address snapshot frozen onto the order.
#[derive(Debug, Clone)]
pub struct ShippingAddress {
    /// Recipient name
    pub name: String,
    /// Street and house number
    pub street: String,
    /// City or town
    pub city: String,
    /// Postal code
    pub postal_code: String,
}

/// Everything needed to finalize a checkout.
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    /// Club the order belongs to
    pub club_id: String,
    /// Member executing the purchase
    pub buyer_id: String,
    /// Member receiving the permits
    pub member_id: String,
    /// The reserved instances being purchased
    pub permit_instance_ids: Vec<String>,
    /// The recipient's per-option discounts
    pub discounts: Vec<MemberDiscount>,
    /// Missing-work-duty fee, if any
    pub work_duty_fee: Option<WorkDutyFee>,
    /// Shipping address snapshot
    pub shipping: ShippingAddress,
}

/// What the caller gets back after a successful checkout.
#[derive(Debug, Clone)]
pub struct OrderSummary {
    /// Id of the created order
    pub order_id: String,
    /// Allocated club-scoped order number
    pub order_number: String,
    /// Final amount in cents
    pub total_cents: i64,
}

/// Creates a PENDING order from a buyer's reserved instances.
///
/// Retries a bounded number of times when the `(club_id, order_number)`
/// unique index rejects a concurrently allocated number; any other failure
/// propagates immediately and leaves nothing written.
pub async fn create_order(
    db: &DatabaseConnection,
    request: &CreateOrderRequest,
) -> Result<OrderSummary> {
    if request.permit_instance_ids.is_empty() {
        return Err(Error::invalid("Order contains no permits"));
    }
    // A repeated id would pass the reservation proof twice and bill the
    // same card as two lines.
    let mut seen = HashSet::with_capacity(request.permit_instance_ids.len());
    if let Some(duplicate) = request
        .permit_instance_ids
        .iter()
        .find(|id| !seen.insert(id.as_str()))
    {
        return Err(Error::invalid(format!(
            "Permit instance {duplicate} appears more than once"
        )));
    }

    for attempt in 1..=ORDER_NUMBER_ATTEMPTS {
        match try_create_order(db, request).await {
            Err(Error::Database(e)) if is_unique_violation(&e) => {
                info!(
                    club_id = request.club_id,
                    attempt, "order number collision, retrying"
                );
            }
            other => return other,
        }
    }

    Err(Error::conflict(format!(
        "Could not allocate an order number for club {} after {ORDER_NUMBER_ATTEMPTS} attempts",
        request.club_id
    )))
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

async fn try_create_order(
    db: &DatabaseConnection,
    request: &CreateOrderRequest,
) -> Result<OrderSummary> {
    let txn = db.begin().await?;

    let parties =
        access::authorize_purchase(&txn, &request.club_id, &request.buyer_id, &request.member_id)
            .await?;
    let now = Utc::now();

    let mut subtotal_cents: i64 = 0;
    let mut discount_total_cents: i64 = 0;
    let mut sold_instance_ids = Vec::with_capacity(request.permit_instance_ids.len());
    let order_id = new_id();
    let mut items: Vec<club_order_item::ActiveModel> = Vec::new();

    for instance_id in &request.permit_instance_ids {
        let instance = PermitInstance::find_by_id(instance_id)
            .one(&txn)
            .await?
            .ok_or_else(|| Error::not_found(format!("permit instance {instance_id}")))?;
        let context = catalog::find_period_for_club(
            &txn,
            &request.club_id,
            &instance.permit_option_period_id,
        )
        .await?;

        if instance.status != InstanceStatus::Reserved {
            return Err(Error::conflict(format!(
                "Reservation for {} is no longer valid",
                context.label()
            )));
        }
        if instance.reserved_by.as_deref() != Some(request.buyer_id.as_str()) {
            return Err(Error::forbidden(format!(
                "Permit {} is reserved by another buyer",
                context.label()
            )));
        }

        let original_cents = context.period.price_cents;
        let percent = request
            .discounts
            .iter()
            .find(|d| d.permit_option_id == context.option.id)
            .map_or(0, |d| d.discount_percent);
        let discount_cents = original_cents * percent / 100;

        subtotal_cents += original_cents;
        discount_total_cents += discount_cents;
        items.push(club_order_item::ActiveModel {
            id: Set(new_id()),
            club_order_id: Set(order_id.clone()),
            item_type: Set(OrderItemType::Permit),
            name: Set(context.label()),
            price_cents: Set(original_cents),
            discount_cents: Set(discount_cents),
            permit_instance_id: Set(Some(instance.id.clone())),
            shop_item_id: Set(None),
        });
        sold_instance_ids.push(instance.id);
    }

    let mut work_duty_fee_cents: i64 = 0;
    if let Some(fee) = &request.work_duty_fee {
        if fee.total_fee_cents > 0 {
            work_duty_fee_cents = fee.total_fee_cents;
            items.push(club_order_item::ActiveModel {
                id: Set(new_id()),
                club_order_id: Set(order_id.clone()),
                item_type: Set(OrderItemType::WorkDutyFee),
                name: Set(format!("Work duty fee ({} missing)", fee.missing)),
                price_cents: Set(fee.total_fee_cents),
                discount_cents: Set(0),
                permit_instance_id: Set(None),
                shop_item_id: Set(None),
            });
        }
    }

    let auto_items = ShopItem::find()
        .filter(shop_item::Column::ClubId.eq(request.club_id.as_str()))
        .filter(shop_item::Column::IsActive.eq(true))
        .filter(shop_item::Column::AutoAddOnPermitPurchase.eq(true))
        .all(&txn)
        .await?;
    for item in auto_items {
        subtotal_cents += item.price_cents;
        items.push(club_order_item::ActiveModel {
            id: Set(new_id()),
            club_order_id: Set(order_id.clone()),
            item_type: Set(OrderItemType::ShopItem),
            name: Set(item.name),
            price_cents: Set(item.price_cents),
            discount_cents: Set(0),
            permit_instance_id: Set(None),
            shop_item_id: Set(Some(item.id)),
        });
    }

    let total_cents = subtotal_cents - discount_total_cents + work_duty_fee_cents;
    let order_number = next_order_number(&txn, &request.club_id, now.year()).await?;

    club_order::ActiveModel {
        id: Set(order_id.clone()),
        club_id: Set(request.club_id.clone()),
        order_number: Set(order_number.clone()),
        member_id: Set(parties.recipient.id.clone()),
        buyer_id: Set(parties.buyer.id.clone()),
        status: Set(OrderStatus::Pending),
        subtotal_cents: Set(subtotal_cents),
        discount_cents: Set(discount_total_cents),
        work_duty_fee_cents: Set(work_duty_fee_cents),
        total_cents: Set(total_cents),
        shipping_name: Set(request.shipping.name.clone()),
        shipping_street: Set(request.shipping.street.clone()),
        shipping_city: Set(request.shipping.city.clone()),
        shipping_postal_code: Set(request.shipping.postal_code.clone()),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;
    club_order_item::Entity::insert_many(items).exec(&txn).await?;

    mark_sold(&txn, &sold_instance_ids, &parties, now).await?;

    txn.commit().await?;
    info!(
        order_number,
        club_id = request.club_id,
        total_cents,
        "order created"
    );

    Ok(OrderSummary {
        order_id,
        order_number,
        total_cents,
    })
}

/// Transitions the purchased instances to `sold`, stamping the recipient as
/// owner and clearing the reservation fields.
async fn mark_sold(
    txn: &DatabaseTransaction,
    instance_ids: &[String],
    parties: &access::PurchaseParties,
    now: chrono::DateTime<Utc>,
) -> Result<()> {
    PermitInstance::update_many()
        .set(permit_instance::ActiveModel {
            status: Set(InstanceStatus::Sold),
            sold_at: Set(Some(now)),
            owner_member_id: Set(Some(parties.recipient.id.clone())),
            owner_name: Set(Some(parties.recipient.name.clone())),
            owner_email: Set(parties.recipient.email.clone()),
            owner_phone: Set(parties.recipient.phone.clone()),
            reserved_by: Set(None),
            reserved_at: Set(None),
            ..Default::default()
        })
        .filter(permit_instance::Column::Id.is_in(instance_ids.iter().map(String::as_str)))
        .exec(txn)
        .await?;
    Ok(())
}

/// Allocates the next `{year}-{nnnn}` order number for a club: max numeric
/// suffix among the club's orders for the year, plus one, zero-padded to 4.
/// Must run inside the order-insert transaction; the unique index plus the
/// retry in [`create_order`] covers concurrent allocations.
async fn next_order_number<C>(db: &C, club_id: &str, year: i32) -> Result<String>
where
    C: ConnectionTrait,
{
    let prefix = format!("{year}-");
    let existing = ClubOrder::find()
        .filter(club_order::Column::ClubId.eq(club_id))
        .filter(club_order::Column::OrderNumber.starts_with(&prefix))
        .all(db)
        .await?;

    let max_suffix = existing
        .iter()
        .filter_map(|order| order.order_number.strip_prefix(&prefix)?.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    Ok(format!("{year}-{:04}", max_suffix + 1))
}

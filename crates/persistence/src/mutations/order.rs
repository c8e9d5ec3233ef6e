// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order, order detail and picking log writes.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fulfillment_domain::{Order, OrderDetail, PickedOrderEntry, TrackingNumber};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{flag, format_optional_timestamp, format_timestamp};
use crate::diesel_schema::{complaints, order_details, orders, outbounds, picked_orders, qc_records};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts an order and its details.
///
/// # Returns
///
/// The id assigned to the order row.
///
/// # Errors
///
/// Returns `UniqueViolation` if the order id or tracking number is already
/// stored, or another error if the insert fails.
pub fn insert_order(conn: &mut _, order: &Order) -> Result<i64, PersistenceError> {
    diesel::insert_into(orders::table)
        .values((
            orders::order_ginee_id.eq(order.order_ginee_id.value()),
            orders::tracking_number.eq(order.tracking_number.value()),
            orders::buyer_name.eq(&order.buyer_name),
            orders::address.eq(&order.address),
            orders::courier.eq(&order.courier),
            orders::processing_status.eq(order.processing_status.as_str()),
            orders::event_status.eq(order.event_status.as_str()),
            orders::sent_before.eq(format_timestamp(order.sent_before)?),
            orders::assigned_by.eq(order.assigned_by),
            orders::assigned_at.eq(format_optional_timestamp(order.assigned_at)?),
            orders::picked_by.eq(order.picked_by),
            orders::picked_at.eq(format_optional_timestamp(order.picked_at)?),
            orders::pending_by.eq(order.pending_by),
            orders::pending_at.eq(format_optional_timestamp(order.pending_at)?),
            orders::changed_by.eq(order.changed_by),
            orders::changed_at.eq(format_optional_timestamp(order.changed_at)?),
            orders::duplicated_by.eq(order.duplicated_by),
            orders::duplicated_at.eq(format_optional_timestamp(order.duplicated_at)?),
            orders::canceled_by.eq(order.canceled_by),
            orders::canceled_at.eq(format_optional_timestamp(order.canceled_at)?),
            orders::complained.eq(flag(order.complained)),
            orders::created_by.eq(order.created_by),
            orders::created_at.eq(format_timestamp(order.created_at)?),
        ))
        .execute(conn)?;

    let order_id: i64 = conn.get_last_insert_rowid()?;

    for detail in &order.details {
        diesel::insert_into(order_details::table)
            .values((
                order_details::order_id.eq(order_id),
                order_details::sku.eq(&detail.sku),
                order_details::product_name.eq(&detail.product_name),
                order_details::variant.eq(detail.variant.as_deref()),
                order_details::quantity.eq(detail.quantity),
                order_details::price.eq(detail.price),
                order_details::is_valid.eq(flag(detail.is_valid)),
            ))
            .execute(conn)?;
    }

    debug!(
        order_id,
        tracking_number = %order.tracking_number,
        details = order.details.len(),
        "Inserted order"
    );
    Ok(order_id)
}
}

backend_fn! {
/// Overwrites every column of an order row, identifiers included.
///
/// # Errors
///
/// Returns an error if the order has no id or the update fails.
pub fn update_order(conn: &mut _, order: &Order) -> Result<(), PersistenceError> {
    let order_id: i64 = order.order_id.ok_or(PersistenceError::MissingRowId("order"))?;

    diesel::update(orders::table.filter(orders::order_id.eq(order_id)))
        .set((
            orders::order_ginee_id.eq(order.order_ginee_id.value()),
            orders::tracking_number.eq(order.tracking_number.value()),
            orders::buyer_name.eq(&order.buyer_name),
            orders::address.eq(&order.address),
            orders::courier.eq(&order.courier),
            orders::processing_status.eq(order.processing_status.as_str()),
            orders::event_status.eq(order.event_status.as_str()),
            orders::sent_before.eq(format_timestamp(order.sent_before)?),
            orders::assigned_by.eq(order.assigned_by),
            orders::assigned_at.eq(format_optional_timestamp(order.assigned_at)?),
            orders::picked_by.eq(order.picked_by),
            orders::picked_at.eq(format_optional_timestamp(order.picked_at)?),
            orders::pending_by.eq(order.pending_by),
            orders::pending_at.eq(format_optional_timestamp(order.pending_at)?),
            orders::changed_by.eq(order.changed_by),
            orders::changed_at.eq(format_optional_timestamp(order.changed_at)?),
            orders::duplicated_by.eq(order.duplicated_by),
            orders::duplicated_at.eq(format_optional_timestamp(order.duplicated_at)?),
            orders::canceled_by.eq(order.canceled_by),
            orders::canceled_at.eq(format_optional_timestamp(order.canceled_at)?),
            orders::complained.eq(flag(order.complained)),
        ))
        .execute(conn)?;

    debug!(order_id, status = %order.processing_status, "Updated order");
    Ok(())
}
}

backend_fn! {
/// Writes quantity and validity of existing detail rows.
///
/// # Errors
///
/// Returns an error if a detail has no id or an update fails.
pub fn update_order_details(conn: &mut _, details: &[OrderDetail]) -> Result<(), PersistenceError> {
    for detail in details {
        let detail_id: i64 = detail
            .order_detail_id
            .ok_or(PersistenceError::MissingRowId("order detail"))?;
        diesel::update(order_details::table.filter(order_details::order_detail_id.eq(detail_id)))
            .set((
                order_details::quantity.eq(detail.quantity),
                order_details::is_valid.eq(flag(detail.is_valid)),
            ))
            .execute(conn)?;
    }
    Ok(())
}
}

backend_fn! {
/// Appends one entry to the picking log.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn append_picked_order(conn: &mut _, entry: &PickedOrderEntry) -> Result<(), PersistenceError> {
    diesel::insert_into(picked_orders::table)
        .values((
            picked_orders::order_id.eq(entry.order_id),
            picked_orders::tracking_number.eq(entry.tracking_number.value()),
            picked_orders::picked_by.eq(entry.picked_by),
            picked_orders::completed_by.eq(entry.completed_by),
            picked_orders::picked_at.eq(format_timestamp(entry.picked_at)?),
        ))
        .execute(conn)?;
    Ok(())
}
}

backend_fn! {
/// Moves QC, outbound and complaint rows to another tracking number.
///
/// The picking log keeps the tracking number it was written under.
///
/// # Errors
///
/// Returns an error if an update fails.
pub fn rename_shipment(
    conn: &mut _,
    from: &TrackingNumber,
    to: &TrackingNumber,
) -> Result<(), PersistenceError> {
    let qc: usize =
        diesel::update(qc_records::table.filter(qc_records::tracking_number.eq(from.value())))
            .set(qc_records::tracking_number.eq(to.value()))
            .execute(conn)?;
    let outbound: usize =
        diesel::update(outbounds::table.filter(outbounds::tracking_number.eq(from.value())))
            .set(outbounds::tracking_number.eq(to.value()))
            .execute(conn)?;
    let complaint: usize =
        diesel::update(complaints::table.filter(complaints::tracking_number.eq(from.value())))
            .set(complaints::tracking_number.eq(to.value()))
            .execute(conn)?;

    debug!(%from, %to, qc, outbound, complaint, "Renamed shipment rows");
    Ok(())
}
}

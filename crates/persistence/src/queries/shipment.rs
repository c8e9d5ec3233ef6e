// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shipment aggregate queries.
//!
//! Resolves a `ShipmentKey` to a tracking number and loads the zero-or-one
//! order, QC record, outbound record and complaint stored under it.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fulfillment::ShipmentKey;
use fulfillment_domain::{
    Carrier, Complaint, ComplaintProduct, ComplaintUser, EventStatus, Order, OrderDetail,
    OrderGineeId, OutboundRecord, PickedOrderEntry, ProcessingStatus, QcBoxDetail, QcLane,
    QcRecord, QcStatus, TrackingNumber,
};
use std::str::FromStr;
use tracing::debug;

use crate::data_models::{parse_optional_timestamp, parse_timestamp};
use crate::diesel_schema::{
    complaint_product_details, complaint_user_details, complaints, order_details, orders,
    outbounds, picked_orders, qc_box_details, qc_records,
};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = orders)]
struct OrderRow {
    order_id: i64,
    order_ginee_id: String,
    tracking_number: String,
    buyer_name: String,
    address: String,
    courier: String,
    processing_status: String,
    event_status: String,
    sent_before: String,
    assigned_by: Option<i64>,
    assigned_at: Option<String>,
    picked_by: Option<i64>,
    picked_at: Option<String>,
    pending_by: Option<i64>,
    pending_at: Option<String>,
    changed_by: Option<i64>,
    changed_at: Option<String>,
    duplicated_by: Option<i64>,
    duplicated_at: Option<String>,
    canceled_by: Option<i64>,
    canceled_at: Option<String>,
    complained: i32,
    created_by: i64,
    created_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = order_details)]
struct OrderDetailRow {
    order_detail_id: i64,
    sku: String,
    product_name: String,
    variant: Option<String>,
    quantity: i32,
    price: i64,
    is_valid: i32,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = qc_records)]
struct QcRow {
    qc_id: i64,
    lane: String,
    tracking_number: String,
    qc_by: i64,
    status: String,
    complained: i32,
    created_at: String,
    updated_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = outbounds)]
struct OutboundRow {
    outbound_id: i64,
    tracking_number: String,
    outbound_by: i64,
    expedition: String,
    expedition_slug: String,
    expedition_color: String,
    complained: i32,
    created_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = complaints)]
struct ComplaintRow {
    complaint_id: i64,
    tracking_number: String,
    order_ginee_id: String,
    channel_id: i64,
    store_id: i64,
    reason: String,
    total_fee: Option<i64>,
    solution: Option<String>,
    checked: i32,
    created_by: i64,
    created_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = complaint_product_details)]
struct ComplaintProductRow {
    sku: String,
    product_name: String,
    variant: Option<String>,
    quantity: i32,
    price: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = picked_orders)]
struct PickedOrderRow {
    order_id: i64,
    tracking_number: String,
    picked_by: Option<i64>,
    completed_by: i64,
    picked_at: String,
}

fn parse_status<T: FromStr>(value: &str) -> Result<T, PersistenceError>
where
    T::Err: std::fmt::Display,
{
    T::from_str(value).map_err(|e| PersistenceError::InvalidData(e.to_string()))
}

fn order_from_rows(row: OrderRow, details: Vec<OrderDetailRow>) -> Result<Order, PersistenceError> {
    let processing_status: ProcessingStatus = parse_status(&row.processing_status)?;
    let event_status: EventStatus = parse_status(&row.event_status)?;

    Ok(Order {
        order_id: Some(row.order_id),
        order_ginee_id: OrderGineeId::from_persisted(row.order_ginee_id),
        tracking_number: TrackingNumber::from_persisted(row.tracking_number),
        buyer_name: row.buyer_name,
        address: row.address,
        courier: row.courier,
        processing_status,
        event_status,
        sent_before: parse_timestamp(&row.sent_before)?,
        assigned_by: row.assigned_by,
        assigned_at: parse_optional_timestamp(row.assigned_at.as_deref())?,
        picked_by: row.picked_by,
        picked_at: parse_optional_timestamp(row.picked_at.as_deref())?,
        pending_by: row.pending_by,
        pending_at: parse_optional_timestamp(row.pending_at.as_deref())?,
        changed_by: row.changed_by,
        changed_at: parse_optional_timestamp(row.changed_at.as_deref())?,
        duplicated_by: row.duplicated_by,
        duplicated_at: parse_optional_timestamp(row.duplicated_at.as_deref())?,
        canceled_by: row.canceled_by,
        canceled_at: parse_optional_timestamp(row.canceled_at.as_deref())?,
        complained: row.complained != 0,
        created_by: row.created_by,
        created_at: parse_timestamp(&row.created_at)?,
        details: details
            .into_iter()
            .map(|d| OrderDetail {
                order_detail_id: Some(d.order_detail_id),
                sku: d.sku,
                product_name: d.product_name,
                variant: d.variant,
                quantity: d.quantity,
                price: d.price,
                is_valid: d.is_valid != 0,
            })
            .collect(),
    })
}

fn qc_from_row(row: QcRow, boxes: Vec<QcBoxDetail>) -> Result<QcRecord, PersistenceError> {
    let lane: QcLane = parse_status(&row.lane)?;
    let status: QcStatus = parse_status(&row.status)?;

    Ok(QcRecord {
        qc_id: Some(row.qc_id),
        lane,
        tracking_number: TrackingNumber::from_persisted(row.tracking_number),
        qc_by: row.qc_by,
        status,
        complained: row.complained != 0,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
        boxes,
    })
}

fn outbound_from_row(row: OutboundRow) -> Result<OutboundRecord, PersistenceError> {
    Ok(OutboundRecord {
        outbound_id: Some(row.outbound_id),
        tracking_number: TrackingNumber::from_persisted(row.tracking_number),
        outbound_by: row.outbound_by,
        carrier: Carrier {
            expedition: row.expedition,
            slug: row.expedition_slug,
            color: row.expedition_color,
        },
        complained: row.complained != 0,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

backend_fn! {
/// Resolves the tracking number a key refers to.
///
/// Tracking number keys resolve to themselves. Order and QC keys resolve
/// through their row; `Ok(None)` means no such row exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn resolve_tracking_number(
    conn: &mut _,
    key: &ShipmentKey,
) -> Result<Option<TrackingNumber>, PersistenceError> {
    let resolved: Option<String> = match key {
        ShipmentKey::TrackingNumber(tn) => return Ok(Some(tn.clone())),
        ShipmentKey::OrderId(order_id) => orders::table
            .filter(orders::order_id.eq(*order_id))
            .select(orders::tracking_number)
            .first::<String>(conn)
            .optional()?,
        ShipmentKey::Qc { lane, qc_id } => qc_records::table
            .filter(qc_records::qc_id.eq(*qc_id))
            .filter(qc_records::lane.eq(lane.as_str()))
            .select(qc_records::tracking_number)
            .first::<String>(conn)
            .optional()?,
    };

    debug!(%key, resolved = ?resolved, "Resolved shipment key");
    Ok(resolved.map(TrackingNumber::from_persisted))
}
}

backend_fn! {
/// Loads the order stored under a tracking number, with its details in
/// insertion order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is malformed.
pub fn load_order(
    conn: &mut _,
    tracking_number: &TrackingNumber,
) -> Result<Option<Order>, PersistenceError> {
    let Some(row) = orders::table
        .filter(orders::tracking_number.eq(tracking_number.value()))
        .select(OrderRow::as_select())
        .first::<OrderRow>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let details: Vec<OrderDetailRow> = order_details::table
        .filter(order_details::order_id.eq(row.order_id))
        .order(order_details::order_detail_id.asc())
        .select(OrderDetailRow::as_select())
        .load(conn)?;

    order_from_rows(row, details).map(Some)
}
}

backend_fn! {
/// Loads the QC record of either lane stored under a tracking number.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is malformed.
pub fn load_qc(
    conn: &mut _,
    tracking_number: &TrackingNumber,
) -> Result<Option<QcRecord>, PersistenceError> {
    let Some(row) = qc_records::table
        .filter(qc_records::tracking_number.eq(tracking_number.value()))
        .select(QcRow::as_select())
        .first::<QcRow>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let boxes: Vec<QcBoxDetail> = qc_box_details::table
        .filter(qc_box_details::qc_id.eq(row.qc_id))
        .order(qc_box_details::qc_box_detail_id.asc())
        .select((qc_box_details::box_id, qc_box_details::quantity))
        .load::<(i64, i32)>(conn)?
        .into_iter()
        .map(|(box_id, quantity)| QcBoxDetail { box_id, quantity })
        .collect();

    qc_from_row(row, boxes).map(Some)
}
}

backend_fn! {
/// Loads the outbound record stored under a tracking number.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is malformed.
pub fn load_outbound(
    conn: &mut _,
    tracking_number: &TrackingNumber,
) -> Result<Option<OutboundRecord>, PersistenceError> {
    outbounds::table
        .filter(outbounds::tracking_number.eq(tracking_number.value()))
        .select(OutboundRow::as_select())
        .first::<OutboundRow>(conn)
        .optional()?
        .map(outbound_from_row)
        .transpose()
}
}

backend_fn! {
/// Loads the complaint filed against a tracking number, with its liable
/// users and product snapshot.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is malformed.
pub fn load_complaint(
    conn: &mut _,
    tracking_number: &TrackingNumber,
) -> Result<Option<Complaint>, PersistenceError> {
    let Some(row) = complaints::table
        .filter(complaints::tracking_number.eq(tracking_number.value()))
        .select(ComplaintRow::as_select())
        .first::<ComplaintRow>(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let users: Vec<ComplaintUser> = complaint_user_details::table
        .filter(complaint_user_details::complaint_id.eq(row.complaint_id))
        .order(complaint_user_details::user_id.asc())
        .select((complaint_user_details::user_id, complaint_user_details::fee_charge))
        .load::<(i64, i64)>(conn)?
        .into_iter()
        .map(|(user_id, fee_charge)| ComplaintUser { user_id, fee_charge })
        .collect();

    let products: Vec<ComplaintProduct> = complaint_product_details::table
        .filter(complaint_product_details::complaint_id.eq(row.complaint_id))
        .order(complaint_product_details::complaint_product_detail_id.asc())
        .select(ComplaintProductRow::as_select())
        .load::<ComplaintProductRow>(conn)?
        .into_iter()
        .map(|p| ComplaintProduct {
            sku: p.sku,
            product_name: p.product_name,
            variant: p.variant,
            quantity: p.quantity,
            price: p.price,
        })
        .collect();

    Ok(Some(Complaint {
        complaint_id: Some(row.complaint_id),
        tracking_number: TrackingNumber::from_persisted(row.tracking_number),
        order_ginee_id: OrderGineeId::from_persisted(row.order_ginee_id),
        channel_id: row.channel_id,
        store_id: row.store_id,
        reason: row.reason,
        total_fee: row.total_fee,
        solution: row.solution,
        checked: row.checked != 0,
        created_by: row.created_by,
        created_at: parse_timestamp(&row.created_at)?,
        users,
        products,
    }))
}
}

backend_fn! {
/// Lists the picking log entries recorded under a tracking number, oldest
/// first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value is malformed.
pub fn list_picked_orders(
    conn: &mut _,
    tracking_number: &TrackingNumber,
) -> Result<Vec<PickedOrderEntry>, PersistenceError> {
    let rows: Vec<PickedOrderRow> = picked_orders::table
        .filter(picked_orders::tracking_number.eq(tracking_number.value()))
        .order(picked_orders::picked_order_id.asc())
        .select(PickedOrderRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            Ok(PickedOrderEntry {
                order_id: row.order_id,
                tracking_number: TrackingNumber::from_persisted(row.tracking_number),
                picked_by: row.picked_by,
                completed_by: row.completed_by,
                picked_at: parse_timestamp(&row.picked_at)?,
            })
        })
        .collect()
}
}

backend_fn! {
/// Counts orders in a given event status.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_orders_with_event_status(
    conn: &mut _,
    event_status: EventStatus,
) -> Result<i64, PersistenceError> {
    Ok(orders::table
        .filter(orders::event_status.eq(event_status.as_str()))
        .count()
        .get_result(conn)?)
}
}

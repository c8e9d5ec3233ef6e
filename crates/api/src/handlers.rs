// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Handlers translate requests into core commands, run them through the
//! persistence layer and convert the stored result back into response
//! types. The acting user and cause arrive in the `CommandContext`.

use std::str::FromStr;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use fulfillment::{Command, CommandContext, ShipmentState};
use fulfillment_audit::AuditEvent;
use fulfillment_domain::{
    CarrierOverride, Complaint, NewOrder, NewOrderDetail, Order, OutboundRecord, PickedOrderEntry,
    QcBoxDetail, QcLane, QcRecord, TrackingNumber,
};
use fulfillment_persistence::{AppliedCommand, ExecuteOutcome, Persistence};

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AssignPickerRequest, AuditEventInfo, BoxDetail, CompleteQcRequest, ComplaintInfo,
    ComplaintProductInfo, ComplaintUserInfo, CreateOrderRequest, CreateOutboundRequest,
    ExpeditionInfo, FileComplaintRequest, GetAuditTimelineResponse, ListExpeditionsResponse,
    ListPickedOrdersResponse, OperationResponse, OrderDetailInfo, OrderInfo, OutboundInfo,
    PickedOrderInfo, QcInfo, ShipmentInfo, StartQcRequest, ValidateProductRequest,
};

// ========================================================================
// Parsing helpers
// ========================================================================

/// Parses a QC lane from a path segment.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the lane is not `ribbon` or `online`.
pub fn parse_lane(raw: &str) -> Result<QcLane, ApiError> {
    QcLane::from_str(raw).map_err(|_| ApiError::InvalidInput {
        field: String::from("lane"),
        message: format!("Unknown QC lane '{raw}', expected 'ribbon' or 'online'"),
    })
}

fn parse_tracking_number(raw: &str) -> Result<TrackingNumber, ApiError> {
    TrackingNumber::new(raw).map_err(translate_domain_error)
}

fn parse_timestamp(field: &str, raw: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339).map_err(|e| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("'{raw}' is not an RFC 3339 timestamp: {e}"),
    })
}

fn format_timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn format_optional(value: Option<OffsetDateTime>) -> Result<Option<String>, ApiError> {
    value.map(format_timestamp).transpose()
}

/// Converts a create request into the raw domain order.
///
/// Only the timestamp is parsed here. Field rules are enforced by
/// `validate_new_order`.
pub(crate) fn to_new_order(request: &CreateOrderRequest) -> Result<NewOrder, ApiError> {
    let sent_before: Option<OffsetDateTime> = request
        .sent_before
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| parse_timestamp("sent_before", raw))
        .transpose()?;

    Ok(NewOrder {
        order_ginee_id: request.order_ginee_id.clone(),
        tracking_number: request.tracking_number.clone(),
        buyer_name: request.buyer_name.clone(),
        address: request.address.clone(),
        courier: request.courier.clone(),
        sent_before,
        details: request
            .details
            .iter()
            .map(|d| NewOrderDetail {
                sku: d.sku.clone(),
                product_name: d.product_name.clone(),
                variant: d.variant.clone(),
                quantity: d.quantity,
                price: d.price,
            })
            .collect(),
    })
}

// ========================================================================
// Response conversion
// ========================================================================

fn order_info(order: &Order) -> Result<OrderInfo, ApiError> {
    Ok(OrderInfo {
        order_id: order.order_id,
        order_ginee_id: order.order_ginee_id.value().to_string(),
        tracking_number: order.tracking_number.value().to_string(),
        buyer_name: order.buyer_name.clone(),
        address: order.address.clone(),
        courier: order.courier.clone(),
        processing_status: order.processing_status,
        event_status: order.event_status,
        sent_before: format_timestamp(order.sent_before)?,
        assigned_by: order.assigned_by,
        picked_by: order.picked_by,
        picked_at: format_optional(order.picked_at)?,
        duplicated_by: order.duplicated_by,
        canceled_by: order.canceled_by,
        complained: order.complained,
        created_by: order.created_by,
        created_at: format_timestamp(order.created_at)?,
        details: order
            .details
            .iter()
            .map(|d| OrderDetailInfo {
                order_detail_id: d.order_detail_id,
                sku: d.sku.clone(),
                product_name: d.product_name.clone(),
                variant: d.variant.clone(),
                quantity: d.quantity,
                price: d.price,
                is_valid: d.is_valid,
            })
            .collect(),
    })
}

fn qc_info(qc: &QcRecord) -> Result<QcInfo, ApiError> {
    Ok(QcInfo {
        qc_id: qc.qc_id,
        lane: qc.lane,
        tracking_number: qc.tracking_number.value().to_string(),
        qc_by: qc.qc_by,
        status: qc.status,
        complained: qc.complained,
        created_at: format_timestamp(qc.created_at)?,
        updated_at: format_timestamp(qc.updated_at)?,
        boxes: qc
            .boxes
            .iter()
            .map(|b| BoxDetail {
                box_id: b.box_id,
                quantity: b.quantity,
            })
            .collect(),
    })
}

fn outbound_info(outbound: &OutboundRecord) -> Result<OutboundInfo, ApiError> {
    Ok(OutboundInfo {
        outbound_id: outbound.outbound_id,
        tracking_number: outbound.tracking_number.value().to_string(),
        outbound_by: outbound.outbound_by,
        expedition: outbound.carrier.expedition.clone(),
        expedition_slug: outbound.carrier.slug.clone(),
        expedition_color: outbound.carrier.color.clone(),
        complained: outbound.complained,
        created_at: format_timestamp(outbound.created_at)?,
    })
}

fn complaint_info(complaint: &Complaint) -> Result<ComplaintInfo, ApiError> {
    Ok(ComplaintInfo {
        complaint_id: complaint.complaint_id,
        tracking_number: complaint.tracking_number.value().to_string(),
        order_ginee_id: complaint.order_ginee_id.value().to_string(),
        channel_id: complaint.channel_id,
        store_id: complaint.store_id,
        reason: complaint.reason.clone(),
        total_fee: complaint.total_fee,
        solution: complaint.solution.clone(),
        checked: complaint.checked,
        created_by: complaint.created_by,
        created_at: format_timestamp(complaint.created_at)?,
        users: complaint
            .users
            .iter()
            .map(|u| ComplaintUserInfo {
                user_id: u.user_id,
                fee_charge: u.fee_charge,
            })
            .collect(),
        products: complaint
            .products
            .iter()
            .map(|p| ComplaintProductInfo {
                sku: p.sku.clone(),
                product_name: p.product_name.clone(),
                variant: p.variant.clone(),
                quantity: p.quantity,
                price: p.price,
            })
            .collect(),
    })
}

fn shipment_info(state: &ShipmentState) -> Result<ShipmentInfo, ApiError> {
    let tracking_number: String = state
        .tracking_number
        .as_ref()
        .or_else(|| state.order.as_ref().map(|o| &o.tracking_number))
        .map(|tn| tn.value().to_string())
        .unwrap_or_default();

    Ok(ShipmentInfo {
        tracking_number,
        order: state.order.as_ref().map(order_info).transpose()?,
        qc: state.qc.as_ref().map(qc_info).transpose()?,
        outbound: state.outbound.as_ref().map(outbound_info).transpose()?,
        complaint: state.complaint.as_ref().map(complaint_info).transpose()?,
    })
}

fn audit_event_info(event: &AuditEvent) -> Result<AuditEventInfo, ApiError> {
    Ok(AuditEventInfo {
        event_id: event.event_id,
        tracking_number: event.tracking_number.value().to_string(),
        actor_id: event.actor.user_id,
        actor_type: event.actor.actor_type.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
        occurred_at: format_timestamp(event.occurred_at)?,
    })
}

fn picked_order_info(entry: &PickedOrderEntry) -> Result<PickedOrderInfo, ApiError> {
    Ok(PickedOrderInfo {
        order_id: entry.order_id,
        tracking_number: entry.tracking_number.value().to_string(),
        picked_by: entry.picked_by,
        completed_by: entry.completed_by,
        picked_at: format_timestamp(entry.picked_at)?,
    })
}

/// Runs a command and converts its outcome into a response.
fn execute(
    persistence: &mut Persistence,
    command: Command,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    let outcome: ExecuteOutcome = persistence
        .execute(command, ctx)
        .map_err(translate_persistence_error)?;

    match outcome {
        ExecuteOutcome::Applied(applied) => {
            let AppliedCommand {
                event_id,
                message,
                shipment,
                renamed,
            } = *applied;
            Ok(OperationResponse {
                applied: true,
                event_id: Some(event_id),
                message,
                shipment: Some(shipment_info(&shipment)?),
                renamed: renamed.as_ref().map(shipment_info).transpose()?,
            })
        }
        ExecuteOutcome::Unchanged { message } => Ok(OperationResponse {
            applied: false,
            event_id: None,
            message,
            shipment: None,
            renamed: None,
        }),
    }
}

// ========================================================================
// Orders
// ========================================================================

/// Creates an order in `ready_to_pick` / `new`.
///
/// # Errors
///
/// Returns an error if the order is malformed, its order id or tracking
/// number is taken, or storage fails.
pub fn create_order(
    persistence: &mut Persistence,
    request: &CreateOrderRequest,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    let order = fulfillment_domain::validate_new_order(&to_new_order(request)?)
        .map_err(translate_domain_error)?;
    execute(persistence, Command::CreateOrder { order }, ctx)
}

/// Assigns a picker to an order.
///
/// # Errors
///
/// Returns an error if the order or user does not exist, the order is not
/// ready to pick, or storage fails.
pub fn assign_picker(
    persistence: &mut Persistence,
    request: &AssignPickerRequest,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    let command: Command = Command::AssignPicker {
        tracking_number: parse_tracking_number(&request.tracking_number)?,
        picker_id: request.picker_id,
    };
    execute(persistence, command, ctx)
}

/// Puts an order being picked on hold and clears its picker.
///
/// # Errors
///
/// Returns an error if the order does not exist, is not being picked, or
/// storage fails.
pub fn mark_pending_picking(
    persistence: &mut Persistence,
    order_id: i64,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    execute(persistence, Command::MarkPendingPicking { order_id }, ctx)
}

/// Completes picking and appends a picking log entry.
///
/// # Errors
///
/// Returns an error if the order does not exist, is not being picked, or
/// storage fails.
pub fn complete_picking(
    persistence: &mut Persistence,
    order_id: i64,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    execute(persistence, Command::CompletePicking { order_id }, ctx)
}

/// Cancels an order.
///
/// # Errors
///
/// Returns an error if the order does not exist, is already cancelled, or
/// storage fails.
pub fn cancel_order(
    persistence: &mut Persistence,
    order_id: i64,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    execute(persistence, Command::CancelOrder { order_id }, ctx)
}

/// Re-runs an order: renames the original and creates a fresh copy under
/// the original identifiers.
///
/// # Errors
///
/// Returns an error if the order does not exist, is in flight or already
/// duplicated, or storage fails.
pub fn duplicate_order(
    persistence: &mut Persistence,
    order_id: i64,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    execute(persistence, Command::DuplicateOrder { order_id }, ctx)
}

// ========================================================================
// Quality control
// ========================================================================

/// Opens a QC record in a lane.
///
/// # Errors
///
/// Returns an error if the order does not exist, is not picked, already has
/// a QC record in either lane, or storage fails.
pub fn start_qc(
    persistence: &mut Persistence,
    lane: QcLane,
    request: &StartQcRequest,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    let command: Command = Command::StartQc {
        lane,
        tracking_number: parse_tracking_number(&request.tracking_number)?,
    };
    execute(persistence, command, ctx)
}

/// Marks one order line as scanned.
///
/// # Errors
///
/// Returns an error if the QC record or SKU does not exist, the quantity
/// differs from the ordered quantity, or storage fails.
pub fn validate_product(
    persistence: &mut Persistence,
    lane: QcLane,
    qc_id: i64,
    request: &ValidateProductRequest,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    let command: Command = Command::ValidateProduct {
        lane,
        qc_id,
        sku: request.sku.trim().to_string(),
        quantity: request.quantity,
    };
    execute(persistence, command, ctx)
}

/// Puts a QC record on hold.
///
/// # Errors
///
/// Returns an error if the record does not exist, is not in progress, or
/// storage fails.
pub fn mark_qc_pending(
    persistence: &mut Persistence,
    lane: QcLane,
    qc_id: i64,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    execute(persistence, Command::MarkQcPending { lane, qc_id }, ctx)
}

/// Resumes a QC record on hold.
///
/// # Errors
///
/// Returns an error if the record does not exist, is not pending, or
/// storage fails.
pub fn resume_qc(
    persistence: &mut Persistence,
    lane: QcLane,
    qc_id: i64,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    execute(persistence, Command::ResumeQc { lane, qc_id }, ctx)
}

/// Completes a QC record with its packing boxes.
///
/// A record that is missing or already completed is reported as unchanged.
///
/// # Errors
///
/// Returns an error if the box list is invalid, a product is not yet
/// validated, or storage fails.
pub fn complete_qc(
    persistence: &mut Persistence,
    lane: QcLane,
    qc_id: i64,
    request: &CompleteQcRequest,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    let boxes: Vec<QcBoxDetail> = request
        .boxes
        .iter()
        .map(|b| QcBoxDetail {
            box_id: b.box_id,
            quantity: b.quantity,
        })
        .collect();
    execute(persistence, Command::CompleteQc { lane, qc_id, boxes }, ctx)
}

// ========================================================================
// Outbound and complaints
// ========================================================================

/// Hands a shipment over to its carrier.
///
/// # Errors
///
/// Returns an error if QC never ran, the outbound already exists, no
/// carrier can be resolved, or storage fails.
pub fn create_outbound(
    persistence: &mut Persistence,
    request: &CreateOutboundRequest,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    let has_override: bool =
        request.expedition.is_some() || request.slug.is_some() || request.color.is_some();
    let command: Command = Command::CreateOutbound {
        tracking_number: parse_tracking_number(&request.tracking_number)?,
        manual_carrier: has_override.then(|| CarrierOverride {
            expedition: request.expedition.clone(),
            slug: request.slug.clone(),
            color: request.color.clone(),
        }),
    };
    execute(persistence, command, ctx)
}

/// Files a complaint and assigns liability.
///
/// # Errors
///
/// Returns an error if no order exists, a complaint was already filed, or
/// storage fails.
pub fn file_complaint(
    persistence: &mut Persistence,
    request: &FileComplaintRequest,
    ctx: &CommandContext,
) -> Result<OperationResponse, ApiError> {
    let command: Command = Command::FileComplaint {
        tracking_number: parse_tracking_number(&request.tracking_number)?,
        channel_id: request.channel_id,
        store_id: request.store_id,
        reason: request.reason.trim().to_string(),
    };
    execute(persistence, command, ctx)
}

// ========================================================================
// Reads
// ========================================================================

/// Retrieves everything stored under a tracking number.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if nothing is stored under it.
pub fn get_shipment(
    persistence: &mut Persistence,
    tracking_number: &str,
) -> Result<ShipmentInfo, ApiError> {
    let tn: TrackingNumber = parse_tracking_number(tracking_number)?;
    let state: ShipmentState = persistence
        .get_shipment(&tn)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Shipment"),
            message: format!("Nothing is stored under '{tn}'"),
        })?;
    shipment_info(&state)
}

/// Retrieves the complaint filed against a tracking number.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if no complaint was filed.
pub fn get_complaint(
    persistence: &mut Persistence,
    tracking_number: &str,
) -> Result<ComplaintInfo, ApiError> {
    let tn: TrackingNumber = parse_tracking_number(tracking_number)?;
    let complaint: Complaint = persistence
        .get_complaint(&tn)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Complaint"),
            message: format!("No complaint was filed for '{tn}'"),
        })?;
    complaint_info(&complaint)
}

/// Lists the picking log of a tracking number.
///
/// # Errors
///
/// Returns an error if the tracking number is malformed or storage fails.
pub fn list_picked_orders(
    persistence: &mut Persistence,
    tracking_number: &str,
) -> Result<ListPickedOrdersResponse, ApiError> {
    let tn: TrackingNumber = parse_tracking_number(tracking_number)?;
    let entries: Vec<PickedOrderEntry> = persistence
        .list_picked_orders(&tn)
        .map_err(translate_persistence_error)?;
    Ok(ListPickedOrdersResponse {
        tracking_number: tn.value().to_string(),
        entries: entries
            .iter()
            .map(picked_order_info)
            .collect::<Result<_, _>>()?,
    })
}

/// Retrieves the audit timeline of a tracking number.
///
/// # Errors
///
/// Returns an error if the tracking number is malformed or storage fails.
pub fn get_audit_timeline(
    persistence: &mut Persistence,
    tracking_number: &str,
) -> Result<GetAuditTimelineResponse, ApiError> {
    let tn: TrackingNumber = parse_tracking_number(tracking_number)?;
    let events: Vec<AuditEvent> = persistence
        .get_audit_timeline(&tn)
        .map_err(translate_persistence_error)?;
    Ok(GetAuditTimelineResponse {
        tracking_number: tn.value().to_string(),
        events: events
            .iter()
            .map(audit_event_info)
            .collect::<Result<_, _>>()?,
    })
}

/// Lists the configured expeditions.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn list_expeditions(
    persistence: &mut Persistence,
) -> Result<ListExpeditionsResponse, ApiError> {
    let expeditions = persistence
        .list_expeditions()
        .map_err(translate_persistence_error)?;
    Ok(ListExpeditionsResponse {
        expeditions: expeditions
            .into_iter()
            .map(|e| ExpeditionInfo {
                expedition_id: e.expedition_id,
                code: e.code,
                name: e.name,
                slug: e.slug,
                color: e.color,
            })
            .collect(),
    })
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The QC lane engine. Ribbon and online lanes share every rule; the lane
//! is data on the record, not a separate code path.

use crate::command::CommandContext;
use crate::error::CoreError;
use crate::state::{Lookups, Mutation, Planned, ShipmentKey, ShipmentState};
use fulfillment_domain::{
    DomainError, EventStatus, Order, OrderDetail, ProcessingStatus, QcBoxDetail, QcLane, QcRecord,
    QcStatus, TrackingNumber, ensure_all_validated, validate_box_details, validate_product,
};

/// Opens a QC record for a shipment whose picking is complete.
///
/// An existing record in either lane is checked first, so two racing
/// starts for the same tracking number see a conflict rather than an
/// order-status error.
pub(crate) fn start(
    state: &ShipmentState,
    key: &ShipmentKey,
    lane: QcLane,
    tracking_number: &TrackingNumber,
    ctx: &CommandContext,
) -> Result<Planned, CoreError> {
    if let Some(existing) = &state.qc {
        let err: DomainError = if existing.lane == lane {
            DomainError::QcAlreadyStarted {
                lane,
                tracking_number: tracking_number.value().to_string(),
            }
        } else {
            DomainError::CrossLaneConflict {
                existing: existing.lane,
                requested: lane,
                tracking_number: tracking_number.value().to_string(),
            }
        };
        return Err(err.into());
    }

    let mut order: Order = state.require_order(key)?.clone();
    if order.event_status == EventStatus::Canceled {
        return Err(DomainError::InvalidTransition {
            operation: "start QC",
            from: order.event_status.as_str().to_string(),
            reason: String::from("order is canceled"),
        }
        .into());
    }
    order
        .processing_status
        .validate_transition(ProcessingStatus::QcProgress, "start QC")?;

    order.processing_status = ProcessingStatus::QcProgress;
    order.touch(ctx.actor_id(), ctx.occurred_at);

    let qc: QcRecord = QcRecord {
        qc_id: None,
        lane,
        tracking_number: tracking_number.clone(),
        qc_by: ctx.actor_id(),
        status: QcStatus::InProgress,
        complained: false,
        created_at: ctx.occurred_at,
        updated_at: ctx.occurred_at,
        boxes: Vec::new(),
    };

    let message: String = format!("QC {lane} started for '{tracking_number}'");
    let after: ShipmentState = ShipmentState {
        order: Some(order.clone()),
        qc: Some(qc.clone()),
        ..state.clone()
    };
    Ok(Planned::new(
        after,
        vec![Mutation::InsertQc(qc), Mutation::UpdateOrder(order)],
        message,
    ))
}

fn require_qc(state: &ShipmentState, lane: QcLane, qc_id: i64) -> Result<&QcRecord, DomainError> {
    state
        .qc_matching(lane, qc_id)
        .ok_or(DomainError::QcRecordNotFound { lane, qc_id })
}

/// Flags one order line as checked.
pub(crate) fn validate(
    state: &ShipmentState,
    key: &ShipmentKey,
    lane: QcLane,
    qc_id: i64,
    sku: &str,
    quantity: i32,
) -> Result<Planned, CoreError> {
    let qc: &QcRecord = require_qc(state, lane, qc_id)?;
    if !qc.status.is_open() {
        return Err(DomainError::InvalidTransition {
            operation: "validate product",
            from: qc.status.as_str().to_string(),
            reason: String::from("QC is already completed"),
        }
        .into());
    }

    let mut order: Order = state.require_order(key)?.clone();
    let index: usize = validate_product(&order.details, sku, quantity)?;
    order.details[index].is_valid = true;

    let detail: OrderDetail = order.details[index].clone();
    let message: String = format!(
        "SKU '{}' validated for '{}'",
        detail.sku, order.tracking_number
    );
    let after: ShipmentState = ShipmentState {
        order: Some(order),
        ..state.clone()
    };
    Ok(Planned::new(
        after,
        vec![Mutation::UpdateOrderDetails(vec![detail])],
        message,
    ))
}

/// Moves a QC record between `in_progress` and `pending`.
pub(crate) fn set_status(
    state: &ShipmentState,
    lane: QcLane,
    qc_id: i64,
    target: QcStatus,
    ctx: &CommandContext,
) -> Result<Planned, CoreError> {
    let operation: &'static str = match target {
        QcStatus::Pending => "mark QC pending",
        QcStatus::InProgress | QcStatus::Completed => "resume QC",
    };
    let mut qc: QcRecord = require_qc(state, lane, qc_id)?.clone();
    qc.status.validate_transition(target, operation)?;

    qc.status = target;
    qc.updated_at = ctx.occurred_at;

    let message: String = format!("QC {lane} record {qc_id} is now {target}");
    let after: ShipmentState = ShipmentState {
        qc: Some(qc.clone()),
        ..state.clone()
    };
    Ok(Planned::new(after, vec![Mutation::UpdateQc(qc)], message))
}

/// Records the boxes and closes the QC record.
///
/// Completing a record that is absent or already completed plans no writes.
pub(crate) fn complete(
    state: &ShipmentState,
    lookups: &Lookups,
    key: &ShipmentKey,
    lane: QcLane,
    qc_id: i64,
    boxes: Vec<QcBoxDetail>,
    ctx: &CommandContext,
) -> Result<Planned, CoreError> {
    let Some(existing) = state.qc_matching(lane, qc_id) else {
        return Ok(Planned::new(
            state.clone(),
            Vec::new(),
            format!("QC {lane} record {qc_id} not found; nothing to complete"),
        ));
    };
    if existing.status == QcStatus::Completed {
        return Ok(Planned::new(
            state.clone(),
            Vec::new(),
            format!("QC {lane} record {qc_id} is already completed"),
        ));
    }

    let mut order: Order = state.require_order(key)?.clone();
    ensure_all_validated(&order.details)?;
    validate_box_details(&boxes, &lookups.known_boxes)?;
    order
        .processing_status
        .validate_transition(ProcessingStatus::QcCompleted, "complete QC")?;

    order.processing_status = ProcessingStatus::QcCompleted;
    order.touch(ctx.actor_id(), ctx.occurred_at);

    let mut qc: QcRecord = existing.clone();
    qc.status = QcStatus::Completed;
    qc.updated_at = ctx.occurred_at;
    qc.boxes.clone_from(&boxes);

    let message: String = format!(
        "QC {lane} completed for '{}' with {} box(es)",
        qc.tracking_number,
        boxes.len()
    );
    let after: ShipmentState = ShipmentState {
        order: Some(order.clone()),
        qc: Some(qc.clone()),
        ..state.clone()
    };
    Ok(Planned::new(
        after,
        vec![
            Mutation::InsertQcBoxes { qc_id, boxes },
            Mutation::UpdateQc(qc),
            Mutation::UpdateOrder(order),
        ],
        message,
    ))
}

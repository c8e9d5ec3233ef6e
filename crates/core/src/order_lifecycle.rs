// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::CommandContext;
use crate::error::CoreError;
use crate::state::{Lookups, Mutation, Planned, ShipmentKey, ShipmentState};
use fulfillment_domain::{
    DomainError, EventStatus, Order, OrderDetail, PickedOrderEntry, ProcessingStatus,
    TrackingNumber, ValidatedOrder, validate_cancel, validate_duplicate,
    validate_picker_assignment,
};

pub(crate) fn create_order(
    state: &ShipmentState,
    lookups: &Lookups,
    order: ValidatedOrder,
    ctx: &CommandContext,
) -> Result<Planned, CoreError> {
    if lookups.order_ginee_id_taken {
        return Err(
            DomainError::DuplicateOrderGineeId(order.order_ginee_id.value().to_string()).into(),
        );
    }
    if state.order.is_some() {
        return Err(
            DomainError::DuplicateTrackingNumber(order.tracking_number.value().to_string()).into(),
        );
    }

    let created: Order = Order {
        order_id: None,
        order_ginee_id: order.order_ginee_id,
        tracking_number: order.tracking_number.clone(),
        buyer_name: order.buyer_name,
        address: order.address,
        courier: order.courier,
        processing_status: ProcessingStatus::ReadyToPick,
        event_status: EventStatus::InProgress,
        sent_before: order.sent_before,
        assigned_by: None,
        assigned_at: None,
        picked_by: None,
        picked_at: None,
        pending_by: None,
        pending_at: None,
        changed_by: None,
        changed_at: None,
        duplicated_by: None,
        duplicated_at: None,
        canceled_by: None,
        canceled_at: None,
        complained: false,
        created_by: ctx.actor_id(),
        created_at: ctx.occurred_at,
        details: order.details,
    };

    let message: String = format!(
        "Created order '{}' with {} detail(s)",
        created.order_ginee_id,
        created.details.len()
    );
    let after: ShipmentState = ShipmentState {
        tracking_number: Some(order.tracking_number),
        order: Some(created.clone()),
        ..state.clone()
    };
    Ok(Planned::new(after, vec![Mutation::InsertOrder(created)], message))
}

pub(crate) fn assign_picker(
    state: &ShipmentState,
    lookups: &Lookups,
    key: &ShipmentKey,
    picker_id: i64,
    ctx: &CommandContext,
) -> Result<Planned, CoreError> {
    let mut order: Order = state.require_order(key)?.clone();
    if !lookups.known_users.contains(&picker_id) {
        return Err(DomainError::UserNotFound(picker_id).into());
    }
    validate_picker_assignment(order.processing_status, order.event_status)?;

    order.processing_status = ProcessingStatus::PickingProgress;
    order.picked_by = Some(picker_id);
    order.assigned_by = Some(ctx.actor_id());
    order.assigned_at = Some(ctx.occurred_at);
    order.touch(ctx.actor_id(), ctx.occurred_at);

    let message: String = format!(
        "Assigned picker {picker_id} to '{}'",
        order.tracking_number
    );
    Ok(with_order(state, order, Vec::new(), message))
}

pub(crate) fn mark_pending_picking(
    state: &ShipmentState,
    key: &ShipmentKey,
    ctx: &CommandContext,
) -> Result<Planned, CoreError> {
    let mut order: Order = state.require_order(key)?.clone();
    order
        .processing_status
        .validate_transition(ProcessingStatus::PickingPending, "mark picking pending")?;

    // A pending order is fully unassigned; the next assignment starts fresh.
    order.processing_status = ProcessingStatus::PickingPending;
    order.picked_by = None;
    order.assigned_by = None;
    order.assigned_at = None;
    order.pending_by = Some(ctx.actor_id());
    order.pending_at = Some(ctx.occurred_at);
    order.touch(ctx.actor_id(), ctx.occurred_at);

    let message: String = format!("Picking of '{}' is pending", order.tracking_number);
    Ok(with_order(state, order, Vec::new(), message))
}

pub(crate) fn complete_picking(
    state: &ShipmentState,
    key: &ShipmentKey,
    ctx: &CommandContext,
) -> Result<Planned, CoreError> {
    let mut order: Order = state.require_order(key)?.clone();
    order
        .processing_status
        .validate_transition(ProcessingStatus::PickingCompleted, "complete picking")?;

    order.processing_status = ProcessingStatus::PickingCompleted;
    order.picked_at = Some(ctx.occurred_at);
    order.touch(ctx.actor_id(), ctx.occurred_at);

    let entry: PickedOrderEntry = PickedOrderEntry {
        order_id: order.persisted_id()?,
        tracking_number: order.tracking_number.clone(),
        picked_by: order.picked_by,
        completed_by: ctx.actor_id(),
        picked_at: ctx.occurred_at,
    };
    let message: String = format!("Picking of '{}' completed", order.tracking_number);
    Ok(with_order(
        state,
        order,
        vec![Mutation::AppendPickedOrder(entry)],
        message,
    ))
}

pub(crate) fn cancel_order(
    state: &ShipmentState,
    key: &ShipmentKey,
    ctx: &CommandContext,
) -> Result<Planned, CoreError> {
    let mut order: Order = state.require_order(key)?.clone();
    validate_cancel(order.processing_status, order.event_status)?;

    order.event_status = EventStatus::Canceled;
    order.canceled_by = Some(ctx.actor_id());
    order.canceled_at = Some(ctx.occurred_at);
    order.touch(ctx.actor_id(), ctx.occurred_at);
    // Quantities are zeroed, never deleted.
    for detail in &mut order.details {
        detail.quantity = 0;
    }

    let details: Vec<OrderDetail> = order.details.clone();
    let message: String = format!("Canceled order '{}'", order.order_ginee_id);
    Ok(with_order(
        state,
        order,
        vec![Mutation::UpdateOrderDetails(details)],
        message,
    ))
}

/// Moves the original order aside and recreates it.
///
/// The original keeps its row id but is renamed (`X-` tracking prefix,
/// `-X2` order id suffix) and any QC, outbound or complaint rows follow it. A fresh
/// order then takes over the original identifiers, starting again at
/// `ready_to_pick` with copies of every detail. Both end up `duplicated`.
pub(crate) fn duplicate_order(
    state: &ShipmentState,
    key: &ShipmentKey,
    ctx: &CommandContext,
) -> Result<Planned, CoreError> {
    let original: &Order = state.require_order(key)?;
    validate_duplicate(original.processing_status, original.event_status)?;

    let original_tracking: TrackingNumber = original.tracking_number.clone();
    let renamed_tracking: TrackingNumber = original_tracking.duplicated();

    let mut renamed: Order = original.clone();
    renamed.order_ginee_id = original.order_ginee_id.duplicated();
    renamed.tracking_number = renamed_tracking.clone();
    renamed.event_status = EventStatus::Duplicated;
    renamed.duplicated_by = Some(ctx.actor_id());
    renamed.duplicated_at = Some(ctx.occurred_at);
    renamed.touch(ctx.actor_id(), ctx.occurred_at);

    let fresh: Order = Order {
        order_id: None,
        order_ginee_id: original.order_ginee_id.clone(),
        tracking_number: original_tracking.clone(),
        buyer_name: original.buyer_name.clone(),
        address: original.address.clone(),
        courier: original.courier.clone(),
        processing_status: ProcessingStatus::ReadyToPick,
        event_status: EventStatus::Duplicated,
        sent_before: original.sent_before,
        assigned_by: None,
        assigned_at: None,
        picked_by: None,
        picked_at: None,
        pending_by: None,
        pending_at: None,
        changed_by: None,
        changed_at: None,
        duplicated_by: Some(ctx.actor_id()),
        duplicated_at: Some(ctx.occurred_at),
        canceled_by: None,
        canceled_at: None,
        complained: false,
        created_by: ctx.actor_id(),
        created_at: ctx.occurred_at,
        details: original
            .details
            .iter()
            .map(|d| OrderDetail {
                order_detail_id: None,
                is_valid: false,
                ..d.clone()
            })
            .collect(),
    };

    let renamed_state: ShipmentState = ShipmentState {
        tracking_number: Some(renamed_tracking.clone()),
        order: Some(renamed.clone()),
        qc: state.qc.clone().map(|mut qc| {
            qc.tracking_number = renamed_tracking.clone();
            qc
        }),
        outbound: state.outbound.clone().map(|mut outbound| {
            outbound.tracking_number = renamed_tracking.clone();
            outbound
        }),
        complaint: state.complaint.clone().map(|mut complaint| {
            complaint.tracking_number = renamed_tracking.clone();
            complaint
        }),
    };
    let after: ShipmentState = ShipmentState {
        tracking_number: Some(original_tracking.clone()),
        order: Some(fresh.clone()),
        qc: None,
        outbound: None,
        complaint: None,
    };

    let message: String = format!(
        "Duplicated order '{}': original moved to '{renamed_tracking}'",
        fresh.order_ginee_id
    );
    // The rename must free the original identifiers before the fresh insert.
    let mutations: Vec<Mutation> = vec![
        Mutation::UpdateOrder(renamed),
        Mutation::RenameShipment {
            from: original_tracking,
            to: renamed_tracking,
        },
        Mutation::InsertOrder(fresh),
    ];

    Ok(Planned {
        after,
        renamed: Some(renamed_state),
        mutations,
        message,
    })
}

/// Builds a plan that writes the order row first, then `extra`.
fn with_order(
    state: &ShipmentState,
    order: Order,
    extra: Vec<Mutation>,
    message: String,
) -> Planned {
    let mut mutations: Vec<Mutation> = Vec::with_capacity(extra.len() + 1);
    mutations.push(Mutation::UpdateOrder(order.clone()));
    mutations.extend(extra);
    let after: ShipmentState = ShipmentState {
        order: Some(order),
        ..state.clone()
    };
    Planned::new(after, mutations, message)
}

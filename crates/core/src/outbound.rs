// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::CommandContext;
use crate::error::CoreError;
use crate::state::{Lookups, Mutation, Planned, ShipmentKey, ShipmentState};
use fulfillment_domain::{
    Carrier, CarrierOverride, DomainError, EventStatus, Order, OutboundRecord, ProcessingStatus,
    TrackingNumber, resolve_carrier,
};

/// Registers the hand-over of a QC'd shipment to its carrier.
///
/// # Errors
///
/// Returns an error if:
/// - An outbound record already exists (conflict)
/// - No order exists (not found)
/// - The order is canceled or not `qc_completed` (invalid state)
/// - QC never ran for the tracking number (not found)
/// - The carrier cannot be resolved
pub(crate) fn create(
    state: &ShipmentState,
    lookups: &Lookups,
    key: &ShipmentKey,
    tracking_number: &TrackingNumber,
    manual_carrier: Option<&CarrierOverride>,
    ctx: &CommandContext,
) -> Result<Planned, CoreError> {
    if state.outbound.is_some() {
        return Err(DomainError::OutboundAlreadyExists(tracking_number.value().to_string()).into());
    }

    let mut order: Order = state.require_order(key)?.clone();
    if order.event_status == EventStatus::Canceled {
        return Err(DomainError::InvalidTransition {
            operation: "create outbound",
            from: order.event_status.as_str().to_string(),
            reason: String::from("order is canceled"),
        }
        .into());
    }
    order
        .processing_status
        .validate_transition(ProcessingStatus::OutboundCompleted, "create outbound")?;
    if state.qc.is_none() {
        return Err(DomainError::QcNotPerformed(tracking_number.value().to_string()).into());
    }

    let carrier: Carrier = resolve_carrier(tracking_number, &lookups.expeditions, manual_carrier)?;

    order.processing_status = ProcessingStatus::OutboundCompleted;
    order.touch(ctx.actor_id(), ctx.occurred_at);

    let outbound: OutboundRecord = OutboundRecord {
        outbound_id: None,
        tracking_number: tracking_number.clone(),
        outbound_by: ctx.actor_id(),
        carrier,
        complained: false,
        created_at: ctx.occurred_at,
    };

    let message: String = format!(
        "Outbound registered for '{tracking_number}' via {}",
        outbound.carrier.expedition
    );
    let after: ShipmentState = ShipmentState {
        order: Some(order.clone()),
        outbound: Some(outbound.clone()),
        ..state.clone()
    };
    Ok(Planned::new(
        after,
        vec![
            Mutation::InsertOutbound(outbound),
            Mutation::UpdateOrder(order),
        ],
        message,
    ))
}

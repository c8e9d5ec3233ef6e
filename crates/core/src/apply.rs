// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, CommandContext};
use crate::error::CoreError;
use crate::state::{Lookups, Planned, ShipmentKey, ShipmentState, Transition, TransitionResult};
use crate::{complaint, order_lifecycle, outbound, qc_lane};
use fulfillment_audit::{Action, AuditEvent, StateSnapshot};
use fulfillment_domain::{DomainError, QcStatus, TrackingNumber};

/// Applies a command to a shipment, producing a write plan and audit event.
///
/// This function is pure: it reads the loaded state and reference data and
/// never performs I/O. Storage is expected to load `state` by
/// `command.key()` and apply the returned mutations atomically.
///
/// # Arguments
///
/// * `state` - The shipment as currently stored (empty if the key matched nothing)
/// * `lookups` - Reference data loaded alongside the shipment
/// * `command` - The command to apply
/// * `ctx` - The acting user, cause and clock reading
///
/// # Returns
///
/// * `Ok(Transition::Applied)` with the write plan and audit event
/// * `Ok(Transition::Unchanged)` if the command was accepted but there is
///   nothing to write
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The command violates domain rules
/// - The targeted order, QC record, user or box does not exist
/// - The operation is not legal from the current status
pub fn apply(
    state: &ShipmentState,
    lookups: &Lookups,
    command: Command,
    ctx: &CommandContext,
) -> Result<Transition, CoreError> {
    let key: ShipmentKey = command.key();
    let name: &'static str = command.name();

    let planned: Planned = match command {
        Command::CreateOrder { order } => order_lifecycle::create_order(state, lookups, order, ctx)?,
        Command::AssignPicker { picker_id, .. } => {
            order_lifecycle::assign_picker(state, lookups, &key, picker_id, ctx)?
        }
        Command::MarkPendingPicking { .. } => {
            order_lifecycle::mark_pending_picking(state, &key, ctx)?
        }
        Command::CompletePicking { .. } => order_lifecycle::complete_picking(state, &key, ctx)?,
        Command::CancelOrder { .. } => order_lifecycle::cancel_order(state, &key, ctx)?,
        Command::DuplicateOrder { .. } => order_lifecycle::duplicate_order(state, &key, ctx)?,
        Command::StartQc {
            lane,
            tracking_number,
        } => qc_lane::start(state, &key, lane, &tracking_number, ctx)?,
        Command::ValidateProduct {
            lane,
            qc_id,
            sku,
            quantity,
        } => qc_lane::validate(state, &key, lane, qc_id, &sku, quantity)?,
        Command::MarkQcPending { lane, qc_id } => {
            qc_lane::set_status(state, lane, qc_id, QcStatus::Pending, ctx)?
        }
        Command::ResumeQc { lane, qc_id } => {
            qc_lane::set_status(state, lane, qc_id, QcStatus::InProgress, ctx)?
        }
        Command::CompleteQc { lane, qc_id, boxes } => {
            qc_lane::complete(state, lookups, &key, lane, qc_id, boxes, ctx)?
        }
        Command::CreateOutbound {
            tracking_number,
            manual_carrier,
        } => outbound::create(
            state,
            lookups,
            &key,
            &tracking_number,
            manual_carrier.as_ref(),
            ctx,
        )?,
        Command::FileComplaint {
            tracking_number,
            channel_id,
            store_id,
            reason,
        } => complaint::file(
            state,
            &key,
            &tracking_number,
            channel_id,
            store_id,
            &reason,
            ctx,
        )?,
    };

    // A plan with no writes is an accepted no-op and is not audited.
    if planned.mutations.is_empty() {
        return Ok(Transition::Unchanged {
            message: planned.message,
        });
    }

    let tracking_number: TrackingNumber = audit_tracking_number(state, &planned, &key)?;
    let before: StateSnapshot = state.to_snapshot();
    let after: StateSnapshot = planned.after.to_snapshot();
    let action: Action = Action::new(String::from(name), Some(planned.message.clone()));

    let audit_event: AuditEvent = AuditEvent::new(
        tracking_number,
        ctx.actor.clone(),
        ctx.cause.clone(),
        action,
        before,
        after,
        ctx.occurred_at,
    );

    Ok(Transition::Applied(Box::new(TransitionResult {
        before: state.clone(),
        after: planned.after,
        renamed: planned.renamed,
        mutations: planned.mutations,
        audit_event,
        message: planned.message,
    })))
}

/// Picks the tracking number an audit event is filed under.
///
/// Every plan with writes targets a shipment with a known tracking number;
/// for `DuplicateOrder` that is the original number, now held by the fresh
/// order.
fn audit_tracking_number(
    before: &ShipmentState,
    planned: &Planned,
    key: &ShipmentKey,
) -> Result<TrackingNumber, CoreError> {
    planned
        .after
        .tracking_number
        .clone()
        .or_else(|| before.tracking_number.clone())
        .or_else(|| match key {
            ShipmentKey::TrackingNumber(tn) => Some(tn.clone()),
            ShipmentKey::OrderId(_) | ShipmentKey::Qc { .. } => None,
        })
        .ok_or_else(|| DomainError::OrderNotFound(key.to_string()).into())
}

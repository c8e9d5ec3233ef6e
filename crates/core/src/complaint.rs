// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::CommandContext;
use crate::error::CoreError;
use crate::state::{Mutation, Planned, ShipmentKey, ShipmentState};
use fulfillment_domain::{
    Complaint, ComplaintProduct, ComplaintUser, DomainError, LiabilityAssessment,
    LiabilitySources, Order, TrackingNumber, assess_liability,
};

/// Files a complaint and seeds one zero-fee liability row per responsible user.
///
/// Every source record that contributed a user is flagged `complained`.
/// The order lines are snapshotted as they are at filing time.
pub(crate) fn file(
    state: &ShipmentState,
    key: &ShipmentKey,
    tracking_number: &TrackingNumber,
    channel_id: i64,
    store_id: i64,
    reason: &str,
    ctx: &CommandContext,
) -> Result<Planned, CoreError> {
    if state.complaint.is_some() {
        return Err(DomainError::ComplaintAlreadyFiled(tracking_number.value().to_string()).into());
    }
    let order: &Order = state.require_order(key)?;
    let reason: &str = reason.trim();
    if reason.is_empty() {
        return Err(DomainError::MissingField { field: "reason" }.into());
    }

    let sources: LiabilitySources = LiabilitySources {
        qc_by: state.qc.as_ref().map(|qc| qc.qc_by),
        outbound_by: state.outbound.as_ref().map(|o| o.outbound_by),
        picked_by: order.picked_by,
        assigned_by: order.assigned_by,
    };
    let assessment: LiabilityAssessment = assess_liability(&sources);

    let mut after: ShipmentState = state.clone();
    let mut mutations: Vec<Mutation> = Vec::new();

    if assessment.qc_complained
        && let Some(qc) = after.qc.as_mut()
    {
        qc.complained = true;
        mutations.push(Mutation::UpdateQc(qc.clone()));
    }
    if assessment.outbound_complained
        && let Some(outbound) = after.outbound.as_mut()
    {
        outbound.complained = true;
        mutations.push(Mutation::UpdateOutbound(outbound.clone()));
    }
    if assessment.order_complained
        && let Some(order) = after.order.as_mut()
    {
        order.complained = true;
        mutations.push(Mutation::UpdateOrder(order.clone()));
    }

    let complaint: Complaint = Complaint {
        complaint_id: None,
        tracking_number: tracking_number.clone(),
        order_ginee_id: order.order_ginee_id.clone(),
        channel_id,
        store_id,
        reason: reason.to_string(),
        total_fee: None,
        solution: None,
        checked: false,
        created_by: ctx.actor_id(),
        created_at: ctx.occurred_at,
        users: assessment
            .users
            .iter()
            .map(|user_id| ComplaintUser {
                user_id: *user_id,
                fee_charge: 0,
            })
            .collect(),
        products: order
            .details
            .iter()
            .map(|d| ComplaintProduct {
                sku: d.sku.clone(),
                product_name: d.product_name.clone(),
                variant: d.variant.clone(),
                quantity: d.quantity,
                price: d.price,
            })
            .collect(),
    };

    let message: String = format!(
        "Complaint filed for '{tracking_number}' against {} user(s)",
        complaint.users.len()
    );
    after.complaint = Some(complaint.clone());
    mutations.push(Mutation::InsertComplaint(complaint));

    Ok(Planned::new(after, mutations, message))
}

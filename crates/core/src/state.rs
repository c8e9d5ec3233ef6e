// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fulfillment_audit::{AuditEvent, StateSnapshot};
use fulfillment_domain::{
    Complaint, DomainError, Expedition, Order, OrderDetail, OutboundRecord, PickedOrderEntry,
    QcBoxDetail, QcLane, QcRecord, TrackingNumber,
};
use std::collections::BTreeSet;

/// Identifies the shipment a command targets.
///
/// Storage resolves a key to a tracking number and loads the zero-or-one
/// matching row from each table. A key that matches nothing resolves to an
/// empty `ShipmentState`; the transition decides whether that is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShipmentKey {
    TrackingNumber(TrackingNumber),
    OrderId(i64),
    Qc { lane: QcLane, qc_id: i64 },
}

impl std::fmt::Display for ShipmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrackingNumber(tn) => write!(f, "tracking number '{tn}'"),
            Self::OrderId(id) => write!(f, "order id {id}"),
            Self::Qc { lane, qc_id } => write!(f, "QC {lane} record {qc_id}"),
        }
    }
}

/// Everything stored about one tracking number.
///
/// The order, the QC record (of whichever lane ran it), the outbound record
/// and the complaint are one logical aggregate. Transitions read the whole
/// aggregate and emit the writes needed to move it forward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipmentState {
    pub tracking_number: Option<TrackingNumber>,
    pub order: Option<Order>,
    pub qc: Option<QcRecord>,
    pub outbound: Option<OutboundRecord>,
    pub complaint: Option<Complaint>,
}

impl ShipmentState {
    /// Creates a state with nothing recorded.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            tracking_number: None,
            order: None,
            qc: None,
            outbound: None,
            complaint: None,
        }
    }

    /// Returns the order or a `NotFound` error naming the reference.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OrderNotFound` if no order is recorded.
    pub fn require_order(&self, reference: &ShipmentKey) -> Result<&Order, DomainError> {
        self.order
            .as_ref()
            .ok_or_else(|| DomainError::OrderNotFound(reference.to_string()))
    }

    /// Returns the QC record only if it is the one with this lane and id.
    #[must_use]
    pub fn qc_matching(&self, lane: QcLane, qc_id: i64) -> Option<&QcRecord> {
        self.qc
            .as_ref()
            .filter(|qc| qc.lane == lane && qc.qc_id == Some(qc_id))
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let order: String = self.order.as_ref().map_or_else(
            || String::from("none"),
            |o| format!("{}/{}", o.processing_status, o.event_status),
        );
        let qc: String = self.qc.as_ref().map_or_else(
            || String::from("none"),
            |q| format!("{}:{}", q.lane, q.status),
        );
        StateSnapshot::new(format!(
            "order={order} qc={qc} outbound={} complaint={}",
            if self.outbound.is_some() { "yes" } else { "none" },
            if self.complaint.is_some() { "yes" } else { "none" },
        ))
    }
}

/// Reference data a transition may consult.
///
/// Loaded by storage inside the same transaction as the shipment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lookups {
    /// Ids of existing users, for picker assignment.
    pub known_users: BTreeSet<i64>,
    /// Ids of existing packing boxes, for QC completion.
    pub known_boxes: BTreeSet<i64>,
    /// Configured carriers, for outbound registration.
    pub expeditions: Vec<Expedition>,
    /// Whether another order already uses the external order id being created.
    pub order_ginee_id_taken: bool,
}

/// A single write produced by a transition.
///
/// Storage applies mutations in order, inside the transaction that loaded
/// the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Insert an order together with its details.
    InsertOrder(Order),
    /// Overwrite the order row (identifiers included) by `order_id`.
    UpdateOrder(Order),
    /// Overwrite quantity and validity of existing detail rows.
    UpdateOrderDetails(Vec<OrderDetail>),
    AppendPickedOrder(PickedOrderEntry),
    InsertQc(QcRecord),
    /// Overwrite status, complaint flag and timestamps of a QC record.
    UpdateQc(QcRecord),
    /// Bulk insert of the box rows written at QC completion.
    InsertQcBoxes {
        qc_id: i64,
        boxes: Vec<QcBoxDetail>,
    },
    InsertOutbound(OutboundRecord),
    /// Overwrite the complaint flag of an outbound record.
    UpdateOutbound(OutboundRecord),
    /// Insert a complaint together with its user and product rows.
    InsertComplaint(Complaint),
    /// Move QC, outbound and complaint rows from one tracking number to another.
    RenameShipment {
        from: TrackingNumber,
        to: TrackingNumber,
    },
}

/// The result of a successful state transition.
///
/// Transitions are atomic: storage applies every mutation and the audit
/// event, or none of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The state before the transition.
    pub before: ShipmentState,
    /// The state after the transition. Ids of inserted rows are `None`.
    pub after: ShipmentState,
    /// The renamed-aside shipment, for `DuplicateOrder` only.
    pub renamed: Option<ShipmentState>,
    /// Writes to apply, in order.
    pub mutations: Vec<Mutation>,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// A human readable summary of what happened.
    pub message: String,
}

/// The outcome of applying a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The command changed state.
    Applied(Box<TransitionResult>),
    /// The command was accepted but there was nothing to do.
    Unchanged {
        /// Why nothing was written.
        message: String,
    },
}

/// What a transition handler produced before the audit event is attached.
#[derive(Debug)]
pub(crate) struct Planned {
    pub after: ShipmentState,
    pub renamed: Option<ShipmentState>,
    pub mutations: Vec<Mutation>,
    pub message: String,
}

impl Planned {
    pub(crate) const fn new(after: ShipmentState, mutations: Vec<Mutation>, message: String) -> Self {
        Self {
            after,
            renamed: None,
            mutations,
            message,
        }
    }
}

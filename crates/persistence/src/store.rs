// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Command execution against one connection.
//!
//! `ShipmentStore` lifts the monomorphic `_sqlite`/`_mysql` queries and
//! mutations onto the connection types so the load → apply → write → audit
//! sequence is written once. The caller owns the transaction.

use diesel::{MysqlConnection, SqliteConnection};
use fulfillment::{
    Command, CommandContext, Lookups, Mutation, ShipmentKey, ShipmentState, Transition,
    TransitionResult, apply,
};
use fulfillment_audit::AuditEvent;
use fulfillment_domain::{
    Complaint, Expedition, Order, OrderDetail, OutboundRecord, PickedOrderEntry, QcBoxDetail,
    QcRecord, TrackingNumber,
};
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::error::PersistenceError;
use crate::{mutations, queries};

/// What `Persistence::execute` did with a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteOutcome {
    /// The command changed state and was audited.
    Applied(Box<AppliedCommand>),
    /// The command was accepted but nothing needed writing.
    Unchanged { message: String },
}

impl ExecuteOutcome {
    /// The human readable summary of the outcome.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Applied(applied) => &applied.message,
            Self::Unchanged { message } => message,
        }
    }
}

/// A committed transition, re-read from storage so every row carries its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedCommand {
    /// The id of the audit event recording the transition.
    pub event_id: i64,
    pub message: String,
    /// The shipment the audit event is filed under, as now stored.
    pub shipment: ShipmentState,
    /// For `DuplicateOrder`, the original shipment under its new tracking number.
    pub renamed: Option<ShipmentState>,
}

/// Storage primitives for the shipment aggregate on one connection.
pub(crate) trait ShipmentStore: PersistenceBackend {
    fn resolve_tracking_number(
        &mut self,
        key: &ShipmentKey,
    ) -> Result<Option<TrackingNumber>, PersistenceError>;
    fn load_order(&mut self, tn: &TrackingNumber) -> Result<Option<Order>, PersistenceError>;
    fn load_qc(&mut self, tn: &TrackingNumber) -> Result<Option<QcRecord>, PersistenceError>;
    fn load_outbound(
        &mut self,
        tn: &TrackingNumber,
    ) -> Result<Option<OutboundRecord>, PersistenceError>;
    fn load_complaint(&mut self, tn: &TrackingNumber)
    -> Result<Option<Complaint>, PersistenceError>;
    fn order_ginee_id_exists(&mut self, order_ginee_id: &str) -> Result<bool, PersistenceError>;
    fn existing_user_ids(&mut self, ids: &[i64]) -> Result<BTreeSet<i64>, PersistenceError>;
    fn existing_box_ids(&mut self, ids: &[i64]) -> Result<BTreeSet<i64>, PersistenceError>;
    fn list_expeditions(&mut self) -> Result<Vec<Expedition>, PersistenceError>;

    fn insert_order(&mut self, order: &Order) -> Result<i64, PersistenceError>;
    fn update_order(&mut self, order: &Order) -> Result<(), PersistenceError>;
    fn update_order_details(&mut self, details: &[OrderDetail]) -> Result<(), PersistenceError>;
    fn append_picked_order(&mut self, entry: &PickedOrderEntry) -> Result<(), PersistenceError>;
    fn rename_shipment(
        &mut self,
        from: &TrackingNumber,
        to: &TrackingNumber,
    ) -> Result<(), PersistenceError>;
    fn insert_qc(&mut self, qc: &QcRecord) -> Result<i64, PersistenceError>;
    fn update_qc(&mut self, qc: &QcRecord) -> Result<(), PersistenceError>;
    fn insert_qc_boxes(&mut self, qc_id: i64, boxes: &[QcBoxDetail])
    -> Result<(), PersistenceError>;
    fn insert_outbound(&mut self, outbound: &OutboundRecord) -> Result<i64, PersistenceError>;
    fn update_outbound(&mut self, outbound: &OutboundRecord) -> Result<(), PersistenceError>;
    fn insert_complaint(&mut self, complaint: &Complaint) -> Result<i64, PersistenceError>;
    fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError>;

    /// Loads every row stored under a tracking number.
    fn load_shipment(&mut self, tn: &TrackingNumber) -> Result<ShipmentState, PersistenceError> {
        Ok(ShipmentState {
            tracking_number: Some(tn.clone()),
            order: self.load_order(tn)?,
            qc: self.load_qc(tn)?,
            outbound: self.load_outbound(tn)?,
            complaint: self.load_complaint(tn)?,
        })
    }

    /// Loads only the reference data the command can consult.
    fn load_lookups(&mut self, command: &Command) -> Result<Lookups, PersistenceError> {
        let mut lookups: Lookups = Lookups::default();
        match command {
            Command::CreateOrder { order } => {
                lookups.order_ginee_id_taken =
                    self.order_ginee_id_exists(order.order_ginee_id.value())?;
            }
            Command::AssignPicker { picker_id, .. } => {
                lookups.known_users = self.existing_user_ids(&[*picker_id])?;
            }
            Command::CompleteQc { boxes, .. } => {
                let ids: Vec<i64> = boxes.iter().map(|b| b.box_id).collect();
                lookups.known_boxes = self.existing_box_ids(&ids)?;
            }
            Command::CreateOutbound { .. } => {
                lookups.expeditions = self.list_expeditions()?;
            }
            Command::MarkPendingPicking { .. }
            | Command::CompletePicking { .. }
            | Command::CancelOrder { .. }
            | Command::DuplicateOrder { .. }
            | Command::StartQc { .. }
            | Command::ValidateProduct { .. }
            | Command::MarkQcPending { .. }
            | Command::ResumeQc { .. }
            | Command::FileComplaint { .. } => {}
        }
        Ok(lookups)
    }

    /// Applies one planned write.
    fn apply_mutation(&mut self, mutation: &Mutation) -> Result<(), PersistenceError> {
        match mutation {
            Mutation::InsertOrder(order) => self.insert_order(order).map(drop),
            Mutation::UpdateOrder(order) => self.update_order(order),
            Mutation::UpdateOrderDetails(details) => self.update_order_details(details),
            Mutation::AppendPickedOrder(entry) => self.append_picked_order(entry),
            Mutation::InsertQc(qc) => self.insert_qc(qc).map(drop),
            Mutation::UpdateQc(qc) => self.update_qc(qc),
            Mutation::InsertQcBoxes { qc_id, boxes } => self.insert_qc_boxes(*qc_id, boxes),
            Mutation::InsertOutbound(outbound) => self.insert_outbound(outbound).map(drop),
            Mutation::UpdateOutbound(outbound) => self.update_outbound(outbound),
            Mutation::InsertComplaint(complaint) => self.insert_complaint(complaint).map(drop),
            Mutation::RenameShipment { from, to } => self.rename_shipment(from, to),
        }
    }
}

macro_rules! impl_shipment_store {
    ($conn:ty, $suffix:ident) => {
        pastey::paste! {
            impl ShipmentStore for $conn {
                fn resolve_tracking_number(
                    &mut self,
                    key: &ShipmentKey,
                ) -> Result<Option<TrackingNumber>, PersistenceError> {
                    queries::[<resolve_tracking_number_ $suffix>](self, key)
                }
                fn load_order(&mut self, tn: &TrackingNumber) -> Result<Option<Order>, PersistenceError> {
                    queries::[<load_order_ $suffix>](self, tn)
                }
                fn load_qc(&mut self, tn: &TrackingNumber) -> Result<Option<QcRecord>, PersistenceError> {
                    queries::[<load_qc_ $suffix>](self, tn)
                }
                fn load_outbound(
                    &mut self,
                    tn: &TrackingNumber,
                ) -> Result<Option<OutboundRecord>, PersistenceError> {
                    queries::[<load_outbound_ $suffix>](self, tn)
                }
                fn load_complaint(
                    &mut self,
                    tn: &TrackingNumber,
                ) -> Result<Option<Complaint>, PersistenceError> {
                    queries::[<load_complaint_ $suffix>](self, tn)
                }
                fn order_ginee_id_exists(&mut self, order_ginee_id: &str) -> Result<bool, PersistenceError> {
                    queries::[<order_ginee_id_exists_ $suffix>](self, order_ginee_id)
                }
                fn existing_user_ids(&mut self, ids: &[i64]) -> Result<BTreeSet<i64>, PersistenceError> {
                    queries::[<existing_user_ids_ $suffix>](self, ids)
                }
                fn existing_box_ids(&mut self, ids: &[i64]) -> Result<BTreeSet<i64>, PersistenceError> {
                    queries::[<existing_box_ids_ $suffix>](self, ids)
                }
                fn list_expeditions(&mut self) -> Result<Vec<Expedition>, PersistenceError> {
                    queries::[<list_expeditions_ $suffix>](self)
                }
                fn insert_order(&mut self, order: &Order) -> Result<i64, PersistenceError> {
                    mutations::[<insert_order_ $suffix>](self, order)
                }
                fn update_order(&mut self, order: &Order) -> Result<(), PersistenceError> {
                    mutations::[<update_order_ $suffix>](self, order)
                }
                fn update_order_details(&mut self, details: &[OrderDetail]) -> Result<(), PersistenceError> {
                    mutations::[<update_order_details_ $suffix>](self, details)
                }
                fn append_picked_order(&mut self, entry: &PickedOrderEntry) -> Result<(), PersistenceError> {
                    mutations::[<append_picked_order_ $suffix>](self, entry)
                }
                fn rename_shipment(
                    &mut self,
                    from: &TrackingNumber,
                    to: &TrackingNumber,
                ) -> Result<(), PersistenceError> {
                    mutations::[<rename_shipment_ $suffix>](self, from, to)
                }
                fn insert_qc(&mut self, qc: &QcRecord) -> Result<i64, PersistenceError> {
                    mutations::[<insert_qc_ $suffix>](self, qc)
                }
                fn update_qc(&mut self, qc: &QcRecord) -> Result<(), PersistenceError> {
                    mutations::[<update_qc_ $suffix>](self, qc)
                }
                fn insert_qc_boxes(
                    &mut self,
                    qc_id: i64,
                    boxes: &[QcBoxDetail],
                ) -> Result<(), PersistenceError> {
                    mutations::[<insert_qc_boxes_ $suffix>](self, qc_id, boxes)
                }
                fn insert_outbound(&mut self, outbound: &OutboundRecord) -> Result<i64, PersistenceError> {
                    mutations::[<insert_outbound_ $suffix>](self, outbound)
                }
                fn update_outbound(&mut self, outbound: &OutboundRecord) -> Result<(), PersistenceError> {
                    mutations::[<update_outbound_ $suffix>](self, outbound)
                }
                fn insert_complaint(&mut self, complaint: &Complaint) -> Result<i64, PersistenceError> {
                    mutations::[<insert_complaint_ $suffix>](self, complaint)
                }
                fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
                    mutations::[<persist_audit_event_ $suffix>](self, event)
                }
            }
        }
    };
}

impl_shipment_store!(SqliteConnection, sqlite);
impl_shipment_store!(MysqlConnection, mysql);

/// Loads, applies, writes and audits one command.
///
/// Must run inside a transaction: any error leaves the caller to roll back,
/// so a rejected or failed command writes nothing.
///
/// # Errors
///
/// Returns `PersistenceError::Rejected` if the state machine refuses the
/// command, or a storage error if a read or write fails.
pub(crate) fn execute_command<S: ShipmentStore>(
    store: &mut S,
    command: Command,
    ctx: &CommandContext,
) -> Result<ExecuteOutcome, PersistenceError> {
    let key: ShipmentKey = command.key();
    let action: &'static str = command.name();

    let state: ShipmentState = match store.resolve_tracking_number(&key)? {
        Some(tn) => {
            store.lock_shipment(tn.value())?;
            store.load_shipment(&tn)?
        }
        None => ShipmentState::empty(),
    };
    let lookups: Lookups = store.load_lookups(&command)?;

    let result: Box<TransitionResult> = match apply(&state, &lookups, command, ctx)? {
        Transition::Applied(result) => result,
        Transition::Unchanged { message } => {
            debug!(action, %key, %message, "Command left shipment unchanged");
            return Ok(ExecuteOutcome::Unchanged { message });
        }
    };

    for mutation in &result.mutations {
        store.apply_mutation(mutation)?;
    }
    let event_id: i64 = store.persist_audit_event(&result.audit_event)?;

    let shipment: ShipmentState = store.load_shipment(&result.audit_event.tracking_number)?;
    let renamed: Option<ShipmentState> = match result
        .renamed
        .as_ref()
        .and_then(|r| r.tracking_number.as_ref())
    {
        Some(tn) => Some(store.load_shipment(tn)?),
        None => None,
    };

    info!(
        event_id,
        action,
        tracking_number = %result.audit_event.tracking_number,
        writes = result.mutations.len(),
        "Applied command"
    );

    Ok(ExecuteOutcome::Applied(Box::new(AppliedCommand {
        event_id,
        message: result.message,
        shipment,
        renamed,
    })))
}

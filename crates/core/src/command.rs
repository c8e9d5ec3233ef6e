// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::ShipmentKey;
use fulfillment_audit::{Actor, Cause};
use fulfillment_domain::{CarrierOverride, QcBoxDetail, QcLane, TrackingNumber, ValidatedOrder};
use time::OffsetDateTime;

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request state changes. Each command
/// names the shipment it targets through `Command::key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new order in `ready_to_pick`.
    CreateOrder {
        /// The normalized order.
        order: ValidatedOrder,
    },
    /// Assign a picker to an order.
    AssignPicker {
        tracking_number: TrackingNumber,
        picker_id: i64,
    },
    /// Unassign the picker and park the order.
    MarkPendingPicking { order_id: i64 },
    /// Confirm that picking is done.
    CompletePicking { order_id: i64 },
    /// Cancel an order and zero its quantities.
    CancelOrder { order_id: i64 },
    /// Rename an order aside and recreate it under its original identifiers.
    DuplicateOrder { order_id: i64 },
    /// Open a QC record in a lane.
    StartQc {
        lane: QcLane,
        tracking_number: TrackingNumber,
    },
    /// Scan one SKU and quantity against the order.
    ValidateProduct {
        lane: QcLane,
        qc_id: i64,
        sku: String,
        quantity: i32,
    },
    /// Park an in-progress QC record.
    MarkQcPending { lane: QcLane, qc_id: i64 },
    /// Pick a pending QC record back up.
    ResumeQc { lane: QcLane, qc_id: i64 },
    /// Record the boxes and finish QC.
    CompleteQc {
        lane: QcLane,
        qc_id: i64,
        boxes: Vec<QcBoxDetail>,
    },
    /// Hand the shipment over to its carrier.
    CreateOutbound {
        tracking_number: TrackingNumber,
        /// Carrier fields for manual-carrier tracking numbers.
        manual_carrier: Option<CarrierOverride>,
    },
    /// File a complaint and resolve liability.
    FileComplaint {
        tracking_number: TrackingNumber,
        channel_id: i64,
        store_id: i64,
        reason: String,
    },
}

impl Command {
    /// Returns the action name recorded in the audit trail.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateOrder { .. } => "CreateOrder",
            Self::AssignPicker { .. } => "AssignPicker",
            Self::MarkPendingPicking { .. } => "MarkPendingPicking",
            Self::CompletePicking { .. } => "CompletePicking",
            Self::CancelOrder { .. } => "CancelOrder",
            Self::DuplicateOrder { .. } => "DuplicateOrder",
            Self::StartQc { .. } => "StartQc",
            Self::ValidateProduct { .. } => "ValidateProduct",
            Self::MarkQcPending { .. } => "MarkQcPending",
            Self::ResumeQc { .. } => "ResumeQc",
            Self::CompleteQc { .. } => "CompleteQc",
            Self::CreateOutbound { .. } => "CreateOutbound",
            Self::FileComplaint { .. } => "FileComplaint",
        }
    }

    /// Returns the key used to locate the target shipment.
    #[must_use]
    pub fn key(&self) -> ShipmentKey {
        match self {
            Self::CreateOrder { order } => ShipmentKey::TrackingNumber(order.tracking_number.clone()),
            Self::AssignPicker {
                tracking_number, ..
            }
            | Self::StartQc {
                tracking_number, ..
            }
            | Self::CreateOutbound {
                tracking_number, ..
            }
            | Self::FileComplaint {
                tracking_number, ..
            } => ShipmentKey::TrackingNumber(tracking_number.clone()),
            Self::MarkPendingPicking { order_id }
            | Self::CompletePicking { order_id }
            | Self::CancelOrder { order_id }
            | Self::DuplicateOrder { order_id } => ShipmentKey::OrderId(*order_id),
            Self::ValidateProduct { lane, qc_id, .. }
            | Self::MarkQcPending { lane, qc_id }
            | Self::ResumeQc { lane, qc_id }
            | Self::CompleteQc { lane, qc_id, .. } => ShipmentKey::Qc {
                lane: *lane,
                qc_id: *qc_id,
            },
        }
    }
}

/// Who is acting, why, and when.
///
/// Passed explicitly to every transition; the clock is read once by the
/// caller so a transition never consults ambient time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    pub actor: Actor,
    pub cause: Cause,
    pub occurred_at: OffsetDateTime,
}

impl CommandContext {
    /// Creates a new context.
    #[must_use]
    pub const fn new(actor: Actor, cause: Cause, occurred_at: OffsetDateTime) -> Self {
        Self {
            actor,
            cause,
            occurred_at,
        }
    }

    /// The acting user id.
    #[must_use]
    pub const fn actor_id(&self) -> i64 {
        self.actor.user_id
    }
}

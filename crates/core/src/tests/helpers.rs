// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CommandContext, CoreError, Lookups, ShipmentState, Transition, TransitionResult};
use fulfillment_audit::{Actor, Cause};
use fulfillment_domain::{
    Carrier, ErrorKind, EventStatus, Expedition, Order, OrderDetail, OrderGineeId,
    OutboundRecord, ProcessingStatus, QcLane, QcRecord, QcStatus, TrackingNumber,
};
use std::collections::BTreeSet;
use time::OffsetDateTime;
use time::macros::datetime;

pub const TRACKING: &str = "JNE100";
pub const ORDER_ID: i64 = 10;
pub const QC_ID: i64 = 20;
pub const PICKER: i64 = 3;
pub const QC_USER: i64 = 4;
pub const OUTBOUND_USER: i64 = 5;

pub fn now() -> OffsetDateTime {
    datetime!(2026-02-10 09:30 UTC)
}

pub fn create_test_context(actor: i64) -> CommandContext {
    CommandContext::new(
        Actor::user(actor),
        Cause::new(String::from("req-1"), String::from("Warehouse request")),
        now(),
    )
}

pub fn create_test_lookups() -> Lookups {
    Lookups {
        known_users: (1..=9).collect(),
        known_boxes: BTreeSet::from([1, 2]),
        expeditions: vec![Expedition {
            expedition_id: 1,
            code: String::from("JNE"),
            name: String::from("JNE Express"),
            slug: String::from("jne"),
            color: String::from("#d32f2f"),
        }],
        order_ginee_id_taken: false,
    }
}

pub fn tracking() -> TrackingNumber {
    TrackingNumber::new(TRACKING).unwrap()
}

pub fn detail(id: i64, sku: &str, quantity: i32, is_valid: bool) -> OrderDetail {
    OrderDetail {
        order_detail_id: Some(id),
        sku: sku.to_string(),
        product_name: format!("Product {sku}"),
        variant: None,
        quantity,
        price: 2500,
        is_valid,
    }
}

pub fn order_at(status: ProcessingStatus, event: EventStatus) -> Order {
    let past_picking: bool = !matches!(
        status,
        ProcessingStatus::ReadyToPick | ProcessingStatus::PickingPending
    );
    let past_qc: bool = matches!(
        status,
        ProcessingStatus::QcCompleted | ProcessingStatus::OutboundCompleted
    );
    Order {
        order_id: Some(ORDER_ID),
        order_ginee_id: OrderGineeId::new("G-100").unwrap(),
        tracking_number: tracking(),
        buyer_name: String::from("Buyer"),
        address: String::from("Street 1"),
        courier: String::from("JNE"),
        processing_status: status,
        event_status: event,
        sent_before: datetime!(2026-02-12 00:00 UTC),
        assigned_by: past_picking.then_some(1),
        assigned_at: past_picking.then(now),
        picked_by: past_picking.then_some(PICKER),
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
        created_by: 1,
        created_at: now(),
        details: vec![
            detail(101, "SKU-A", 2, past_qc),
            detail(102, "SKU-B", 1, past_qc),
        ],
    }
}

pub fn qc_record(lane: QcLane, status: QcStatus) -> QcRecord {
    QcRecord {
        qc_id: Some(QC_ID),
        lane,
        tracking_number: tracking(),
        qc_by: QC_USER,
        status,
        complained: false,
        created_at: now(),
        updated_at: now(),
        boxes: Vec::new(),
    }
}

pub fn outbound_record() -> OutboundRecord {
    OutboundRecord {
        outbound_id: Some(30),
        tracking_number: tracking(),
        outbound_by: OUTBOUND_USER,
        carrier: Carrier {
            expedition: String::from("JNE Express"),
            slug: String::from("jne"),
            color: String::from("#d32f2f"),
        },
        complained: false,
        created_at: now(),
    }
}

/// A shipment with only an order row.
pub fn order_only(status: ProcessingStatus, event: EventStatus) -> ShipmentState {
    ShipmentState {
        tracking_number: Some(tracking()),
        order: Some(order_at(status, event)),
        ..ShipmentState::empty()
    }
}

/// A shipment whose QC and outbound rows agree with the order status.
pub fn shipment_at(status: ProcessingStatus, event: EventStatus) -> ShipmentState {
    let mut state: ShipmentState = order_only(status, event);
    state.qc = match status {
        ProcessingStatus::QcProgress => Some(qc_record(QcLane::Ribbon, QcStatus::InProgress)),
        ProcessingStatus::QcCompleted | ProcessingStatus::OutboundCompleted => {
            Some(qc_record(QcLane::Ribbon, QcStatus::Completed))
        }
        _ => None,
    };
    if status == ProcessingStatus::OutboundCompleted {
        state.outbound = Some(outbound_record());
    }
    state
}

pub fn expect_applied(result: Result<Transition, CoreError>) -> TransitionResult {
    match result {
        Ok(Transition::Applied(result)) => *result,
        other => panic!("expected an applied transition, got {other:?}"),
    }
}

pub fn expect_kind(result: Result<Transition, CoreError>, kind: ErrorKind) -> CoreError {
    let err: CoreError = result.expect_err("expected the command to be rejected");
    assert_eq!(err.kind(), kind, "unexpected error: {err}");
    err
}

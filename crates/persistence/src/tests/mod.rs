// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test module for the persistence crate.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod atomicity_tests;
mod complaint_tests;

use crate::{AppliedCommand, ExecuteOutcome, Persistence, PersistenceError};
use fulfillment::{Command, CommandContext, ShipmentState};
use fulfillment_audit::{Actor, Cause};
use fulfillment_domain::{
    ErrorKind, NewOrder, NewOrderDetail, QcBoxDetail, QcLane, TrackingNumber, validate_new_order,
};
use time::OffsetDateTime;
use time::macros::datetime;

/// A database seeded with the reference data every pipeline needs.
pub struct Fixture {
    pub persistence: Persistence,
    pub admin: i64,
    pub picker: i64,
    pub qc_user: i64,
    pub outbound_user: i64,
    pub small_box: i64,
    pub large_box: i64,
}

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-02 08:15 UTC)
}

pub fn create_test_context(actor: i64) -> CommandContext {
    CommandContext::new(
        Actor::user(actor),
        Cause::new(String::from("test-request"), String::from("Test operation")),
        now(),
    )
}

pub fn seed(mut persistence: Persistence) -> Fixture {
    let admin: i64 = persistence.insert_user("Admin").unwrap();
    let picker: i64 = persistence.insert_user("Picker").unwrap();
    let qc_user: i64 = persistence.insert_user("Checker").unwrap();
    let outbound_user: i64 = persistence.insert_user("Dispatcher").unwrap();
    let small_box: i64 = persistence.insert_packing_box("Small").unwrap();
    let large_box: i64 = persistence.insert_packing_box("Large").unwrap();
    persistence
        .insert_expedition("JNE", "JNE Express", "jne", "#d32f2f")
        .unwrap();
    persistence
        .insert_expedition("JN", "JN Cargo", "jn-cargo", "#1976d2")
        .unwrap();

    Fixture {
        persistence,
        admin,
        picker,
        qc_user,
        outbound_user,
        small_box,
        large_box,
    }
}

pub fn setup() -> Fixture {
    seed(Persistence::new_in_memory().unwrap())
}

pub fn tracking(raw: &str) -> TrackingNumber {
    TrackingNumber::new(raw).unwrap()
}

pub fn new_order(order_ginee_id: &str, tracking_number: &str) -> NewOrder {
    NewOrder {
        order_ginee_id: order_ginee_id.to_string(),
        tracking_number: tracking_number.to_string(),
        buyer_name: String::from("Sari"),
        address: String::from("Jl. Merdeka 1, Bandung"),
        courier: String::from("JNE"),
        sent_before: Some(datetime!(2026-03-04 00:00 UTC)),
        details: vec![
            NewOrderDetail {
                sku: String::from("SKU-A"),
                product_name: String::from("Kaos Polos"),
                variant: Some(String::from("Hitam, L")),
                quantity: 2,
                price: 45_000,
            },
            NewOrderDetail {
                sku: String::from("SKU-B"),
                product_name: String::from("Topi"),
                variant: None,
                quantity: 1,
                price: 30_000,
            },
        ],
    }
}

/// Unwraps an applied outcome.
pub fn applied(outcome: ExecuteOutcome) -> AppliedCommand {
    match outcome {
        ExecuteOutcome::Applied(applied) => *applied,
        ExecuteOutcome::Unchanged { message } => panic!("expected a write, got: {message}"),
    }
}

/// Returns the taxonomy bucket of a rejected command.
pub fn rejection_kind(err: &PersistenceError) -> ErrorKind {
    match err {
        PersistenceError::Rejected(core) => core.kind(),
        other => panic!("expected a rejection, got: {other}"),
    }
}

pub fn run(fx: &mut Fixture, command: Command, actor: i64) -> AppliedCommand {
    applied(
        fx.persistence
            .execute(command, &create_test_context(actor))
            .unwrap(),
    )
}

/// Creates an order and returns its id.
pub fn create_order(fx: &mut Fixture, order_ginee_id: &str, tracking_number: &str) -> i64 {
    let order = validate_new_order(&new_order(order_ginee_id, tracking_number)).unwrap();
    let admin: i64 = fx.admin;
    let result: AppliedCommand = run(fx, Command::CreateOrder { order }, admin);
    result.shipment.order.unwrap().order_id.unwrap()
}

/// Creates an order and walks it through picking.
pub fn create_picked_order(fx: &mut Fixture, order_ginee_id: &str, tracking_number: &str) -> i64 {
    let order_id: i64 = create_order(fx, order_ginee_id, tracking_number);
    let (admin, picker): (i64, i64) = (fx.admin, fx.picker);
    run(
        fx,
        Command::AssignPicker {
            tracking_number: tracking(tracking_number),
            picker_id: picker,
        },
        admin,
    );
    run(fx, Command::CompletePicking { order_id }, picker);
    order_id
}

/// Opens QC in a lane and returns the QC record id.
pub fn start_qc(fx: &mut Fixture, lane: QcLane, tracking_number: &str) -> i64 {
    let qc_user: i64 = fx.qc_user;
    let result: AppliedCommand = run(
        fx,
        Command::StartQc {
            lane,
            tracking_number: tracking(tracking_number),
        },
        qc_user,
    );
    result.shipment.qc.unwrap().qc_id.unwrap()
}

/// Scans every line of the fixture order.
pub fn validate_all(fx: &mut Fixture, lane: QcLane, qc_id: i64) {
    let qc_user: i64 = fx.qc_user;
    for (sku, quantity) in [("SKU-A", 2), ("SKU-B", 1)] {
        run(
            fx,
            Command::ValidateProduct {
                lane,
                qc_id,
                sku: sku.to_string(),
                quantity,
            },
            qc_user,
        );
    }
}

/// Walks an order from creation to a completed QC record.
pub fn create_qc_completed(
    fx: &mut Fixture,
    lane: QcLane,
    order_ginee_id: &str,
    tracking_number: &str,
) -> i64 {
    create_picked_order(fx, order_ginee_id, tracking_number);
    let qc_id: i64 = start_qc(fx, lane, tracking_number);
    validate_all(fx, lane, qc_id);
    let (qc_user, small_box): (i64, i64) = (fx.qc_user, fx.small_box);
    run(
        fx,
        Command::CompleteQc {
            lane,
            qc_id,
            boxes: vec![QcBoxDetail {
                box_id: small_box,
                quantity: 1,
            }],
        },
        qc_user,
    );
    qc_id
}

pub fn shipment(fx: &mut Fixture, tracking_number: &str) -> ShipmentState {
    fx.persistence
        .get_shipment(&tracking(tracking_number))
        .unwrap()
        .unwrap()
}

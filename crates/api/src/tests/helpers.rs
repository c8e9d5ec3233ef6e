// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use fulfillment::CommandContext;
use fulfillment_audit::{Actor, Cause};
use fulfillment_domain::QcLane;
use fulfillment_persistence::Persistence;
use time::macros::datetime;

use crate::{
    AssignPickerRequest, BoxDetail, CompleteQcRequest, CreateOrderRequest, OperationResponse,
    OrderDetailInput, StartQcRequest, ValidateProductRequest, assign_picker, complete_picking,
    complete_qc, create_order, start_qc, validate_product,
};

/// An in-memory database with users, boxes and carriers in place.
pub struct TestEnv {
    pub persistence: Persistence,
    pub admin: i64,
    pub picker: i64,
    pub qc_user: i64,
    pub outbound_user: i64,
    pub small_box: i64,
}

pub fn setup() -> TestEnv {
    let mut persistence = Persistence::new_in_memory().expect("in-memory database");
    let admin: i64 = persistence.insert_user("Admin").unwrap();
    let picker: i64 = persistence.insert_user("Picker").unwrap();
    let qc_user: i64 = persistence.insert_user("Checker").unwrap();
    let outbound_user: i64 = persistence.insert_user("Dispatcher").unwrap();
    let small_box: i64 = persistence.insert_packing_box("Small").unwrap();
    persistence
        .insert_expedition("JNE", "JNE Express", "jne", "#d32f2f")
        .unwrap();
    persistence
        .insert_expedition("SPX", "Shopee Express", "spx", "#ee4d2d")
        .unwrap();

    TestEnv {
        persistence,
        admin,
        picker,
        qc_user,
        outbound_user,
        small_box,
    }
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn ctx(actor: i64) -> CommandContext {
    CommandContext::new(
        Actor::user(actor),
        create_test_cause(),
        datetime!(2026-03-02 09:30 UTC),
    )
}

pub fn create_order_request(order_ginee_id: &str, tracking_number: &str) -> CreateOrderRequest {
    CreateOrderRequest {
        order_ginee_id: order_ginee_id.to_string(),
        tracking_number: tracking_number.to_string(),
        buyer_name: String::from("Budi"),
        address: String::from("Jl. Sudirman 5, Jakarta"),
        courier: String::from("JNE"),
        sent_before: Some(String::from("2026-03-04T17:00:00+07:00")),
        details: vec![
            OrderDetailInput {
                sku: String::from("SKU-A"),
                product_name: String::from("Kemeja"),
                variant: Some(String::from("Biru, M")),
                quantity: 2,
                price: 120_000,
            },
            OrderDetailInput {
                sku: String::from("SKU-B"),
                product_name: String::from("Sabuk"),
                variant: None,
                quantity: 1,
                price: 55_000,
            },
        ],
    }
}

/// Creates an order and returns its id.
pub fn create_test_order(env: &mut TestEnv, order_ginee_id: &str, tracking_number: &str) -> i64 {
    let response: OperationResponse = create_order(
        &mut env.persistence,
        &create_order_request(order_ginee_id, tracking_number),
        &ctx(env.admin),
    )
    .unwrap();
    response.shipment.unwrap().order.unwrap().order_id.unwrap()
}

/// Creates an order and completes picking.
pub fn create_picked_order(env: &mut TestEnv, order_ginee_id: &str, tracking_number: &str) -> i64 {
    let order_id: i64 = create_test_order(env, order_ginee_id, tracking_number);
    assign_picker(
        &mut env.persistence,
        &AssignPickerRequest {
            tracking_number: tracking_number.to_string(),
            picker_id: env.picker,
        },
        &ctx(env.admin),
    )
    .unwrap();
    complete_picking(&mut env.persistence, order_id, &ctx(env.picker)).unwrap();
    order_id
}

/// Opens QC and returns the QC record id.
pub fn start_test_qc(env: &mut TestEnv, lane: QcLane, tracking_number: &str) -> i64 {
    let response: OperationResponse = start_qc(
        &mut env.persistence,
        lane,
        &StartQcRequest {
            tracking_number: tracking_number.to_string(),
        },
        &ctx(env.qc_user),
    )
    .unwrap();
    response.shipment.unwrap().qc.unwrap().qc_id.unwrap()
}

/// Scans both lines of the fixture order.
pub fn validate_all(env: &mut TestEnv, lane: QcLane, qc_id: i64) {
    for (sku, quantity) in [("SKU-A", 2), ("SKU-B", 1)] {
        validate_product(
            &mut env.persistence,
            lane,
            qc_id,
            &ValidateProductRequest {
                sku: sku.to_string(),
                quantity,
            },
            &ctx(env.qc_user),
        )
        .unwrap();
    }
}

/// Walks an order through a completed QC record in a lane.
pub fn create_qc_completed(
    env: &mut TestEnv,
    lane: QcLane,
    order_ginee_id: &str,
    tracking_number: &str,
) -> i64 {
    create_picked_order(env, order_ginee_id, tracking_number);
    let qc_id: i64 = start_test_qc(env, lane, tracking_number);
    validate_all(env, lane, qc_id);
    complete_qc(
        &mut env.persistence,
        lane,
        qc_id,
        &CompleteQcRequest {
            boxes: vec![BoxDetail {
                box_id: env.small_box,
                quantity: 1,
            }],
        },
        &ctx(env.qc_user),
    )
    .unwrap();
    qc_id
}

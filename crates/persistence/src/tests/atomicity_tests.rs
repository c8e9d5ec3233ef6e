// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! All-or-nothing behavior of `Persistence::execute`.
//!
//! A rejected command must leave no rows and no audit event behind, and a
//! storage failure part way through a write plan must roll back the writes
//! that already succeeded.

use super::{
    create_order, create_picked_order, create_qc_completed, create_test_context, new_order,
    rejection_kind, setup, shipment, start_qc, tracking, validate_all,
};
use crate::{BackendConnection, PersistenceError};
use diesel::RunQueryDsl;
use fulfillment::Command;
use fulfillment_domain::{
    ErrorKind, EventStatus, ProcessingStatus, QcBoxDetail, QcLane, QcStatus, validate_new_order,
};

fn timeline_len(fx: &mut super::Fixture, tn: &str) -> usize {
    fx.persistence.get_audit_timeline(&tracking(tn)).unwrap().len()
}

#[test]
fn test_duplicate_box_rejected_without_writes() {
    let mut fx = setup();
    create_picked_order(&mut fx, "GINEE-1", "JNE100");
    let qc_id: i64 = start_qc(&mut fx, QcLane::Ribbon, "JNE100");
    validate_all(&mut fx, QcLane::Ribbon, qc_id);
    let events_before: usize = timeline_len(&mut fx, "JNE100");

    let small_box: i64 = fx.small_box;
    let err: PersistenceError = fx
        .persistence
        .execute(
            Command::CompleteQc {
                lane: QcLane::Ribbon,
                qc_id,
                boxes: vec![
                    QcBoxDetail {
                        box_id: small_box,
                        quantity: 1,
                    },
                    QcBoxDetail {
                        box_id: small_box,
                        quantity: 2,
                    },
                ],
            },
            &create_test_context(fx.qc_user),
        )
        .unwrap_err();

    assert_eq!(rejection_kind(&err), ErrorKind::Validation);
    let state = shipment(&mut fx, "JNE100");
    let qc = state.qc.unwrap();
    assert_eq!(qc.status, QcStatus::InProgress);
    assert!(qc.boxes.is_empty());
    assert_eq!(
        state.order.unwrap().processing_status,
        ProcessingStatus::QcProgress
    );
    assert_eq!(timeline_len(&mut fx, "JNE100"), events_before);
}

#[test]
fn test_unknown_box_is_not_found() {
    let mut fx = setup();
    create_picked_order(&mut fx, "GINEE-1", "JNE100");
    let qc_id: i64 = start_qc(&mut fx, QcLane::Ribbon, "JNE100");
    validate_all(&mut fx, QcLane::Ribbon, qc_id);

    let err: PersistenceError = fx
        .persistence
        .execute(
            Command::CompleteQc {
                lane: QcLane::Ribbon,
                qc_id,
                boxes: vec![QcBoxDetail {
                    box_id: 9_999,
                    quantity: 1,
                }],
            },
            &create_test_context(fx.qc_user),
        )
        .unwrap_err();

    assert_eq!(rejection_kind(&err), ErrorKind::NotFound);
}

#[test]
fn test_completing_before_every_line_is_validated_is_incomplete() {
    let mut fx = setup();
    create_picked_order(&mut fx, "GINEE-1", "JNE100");
    let qc_id: i64 = start_qc(&mut fx, QcLane::Online, "JNE100");

    let err: PersistenceError = fx
        .persistence
        .execute(
            Command::CompleteQc {
                lane: QcLane::Online,
                qc_id,
                boxes: vec![QcBoxDetail {
                    box_id: fx.small_box,
                    quantity: 1,
                }],
            },
            &create_test_context(fx.qc_user),
        )
        .unwrap_err();

    assert_eq!(rejection_kind(&err), ErrorKind::Incomplete);
}

fn scan(fx: &mut super::Fixture, lane: QcLane, qc_id: i64, sku: &str, quantity: i32) {
    let qc_user: i64 = fx.qc_user;
    super::run(
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

fn complete_qc(
    fx: &mut super::Fixture,
    lane: QcLane,
    qc_id: i64,
) -> Result<crate::ExecuteOutcome, PersistenceError> {
    let small_box: i64 = fx.small_box;
    fx.persistence.execute(
        Command::CompleteQc {
            lane,
            qc_id,
            boxes: vec![QcBoxDetail {
                box_id: small_box,
                quantity: 1,
            }],
        },
        &create_test_context(fx.qc_user),
    )
}

#[test]
fn test_one_unvalidated_line_blocks_completion() {
    let mut fx = setup();
    create_picked_order(&mut fx, "GINEE-1", "JNE100");
    let qc_id: i64 = start_qc(&mut fx, QcLane::Ribbon, "JNE100");
    scan(&mut fx, QcLane::Ribbon, qc_id, "SKU-A", 2);

    let err: PersistenceError = complete_qc(&mut fx, QcLane::Ribbon, qc_id).unwrap_err();
    assert_eq!(rejection_kind(&err), ErrorKind::Incomplete);
    assert!(err.to_string().contains("SKU-B"));
    assert!(!err.to_string().contains("SKU-A"));

    scan(&mut fx, QcLane::Ribbon, qc_id, "SKU-B", 1);
    super::applied(complete_qc(&mut fx, QcLane::Ribbon, qc_id).unwrap());
    assert_eq!(shipment(&mut fx, "JNE100").qc.unwrap().status, QcStatus::Completed);
}

#[test]
fn test_single_line_order_completes_once_validated() {
    let mut fx = setup();
    let mut order = new_order("GINEE-1", "JNE100");
    order.details.truncate(1);
    let order = validate_new_order(&order).unwrap();
    let (admin, picker): (i64, i64) = (fx.admin, fx.picker);
    let order_id: i64 = super::run(&mut fx, Command::CreateOrder { order }, admin)
        .shipment
        .order
        .unwrap()
        .order_id
        .unwrap();
    super::run(
        &mut fx,
        Command::AssignPicker {
            tracking_number: tracking("JNE100"),
            picker_id: picker,
        },
        admin,
    );
    super::run(&mut fx, Command::CompletePicking { order_id }, picker);
    let qc_id: i64 = start_qc(&mut fx, QcLane::Online, "JNE100");

    let err: PersistenceError = complete_qc(&mut fx, QcLane::Online, qc_id).unwrap_err();
    assert_eq!(rejection_kind(&err), ErrorKind::Incomplete);

    scan(&mut fx, QcLane::Online, qc_id, "SKU-A", 2);
    super::applied(complete_qc(&mut fx, QcLane::Online, qc_id).unwrap());
    assert_eq!(
        shipment(&mut fx, "JNE100").order.unwrap().processing_status,
        ProcessingStatus::QcCompleted
    );
}

#[test]
fn test_repeated_sku_order_can_complete_qc() {
    let mut fx = setup();
    let mut order = new_order("GINEE-1", "JNE100");
    order.details[1].sku = String::from("SKU-A");
    order.details[1].quantity = 2;
    let order = validate_new_order(&order).unwrap();
    let (admin, picker): (i64, i64) = (fx.admin, fx.picker);
    let order_id: i64 = super::run(&mut fx, Command::CreateOrder { order }, admin)
        .shipment
        .order
        .unwrap()
        .order_id
        .unwrap();
    super::run(
        &mut fx,
        Command::AssignPicker {
            tracking_number: tracking("JNE100"),
            picker_id: picker,
        },
        admin,
    );
    super::run(&mut fx, Command::CompletePicking { order_id }, picker);
    let qc_id: i64 = start_qc(&mut fx, QcLane::Ribbon, "JNE100");

    scan(&mut fx, QcLane::Ribbon, qc_id, "SKU-A", 2);
    let err: PersistenceError = complete_qc(&mut fx, QcLane::Ribbon, qc_id).unwrap_err();
    assert_eq!(rejection_kind(&err), ErrorKind::Incomplete);

    scan(&mut fx, QcLane::Ribbon, qc_id, "SKU-A", 2);
    let details = shipment(&mut fx, "JNE100").order.unwrap().details;
    assert!(details.iter().all(|d| d.is_valid));

    super::applied(complete_qc(&mut fx, QcLane::Ribbon, qc_id).unwrap());
    assert_eq!(
        shipment(&mut fx, "JNE100").order.unwrap().processing_status,
        ProcessingStatus::QcCompleted
    );
}

#[test]
fn test_rejected_command_writes_no_audit_event() {
    let mut fx = setup();
    let order_id: i64 = create_order(&mut fx, "GINEE-1", "JNE100");

    // Picking cannot complete before a picker is assigned.
    let err: PersistenceError = fx
        .persistence
        .execute(
            Command::CompletePicking { order_id },
            &create_test_context(fx.picker),
        )
        .unwrap_err();

    assert_eq!(rejection_kind(&err), ErrorKind::InvalidState);
    assert_eq!(timeline_len(&mut fx, "JNE100"), 1);
    assert!(fx
        .persistence
        .list_picked_orders(&tracking("JNE100"))
        .unwrap()
        .is_empty());
}

#[test]
fn test_creating_an_existing_order_is_a_conflict() {
    let mut fx = setup();
    create_order(&mut fx, "GINEE-1", "JNE100");

    let same_ginee_id = validate_new_order(&new_order("GINEE-1", "JNE101")).unwrap();
    let err: PersistenceError = fx
        .persistence
        .execute(
            Command::CreateOrder {
                order: same_ginee_id,
            },
            &create_test_context(fx.admin),
        )
        .unwrap_err();
    assert_eq!(rejection_kind(&err), ErrorKind::Conflict);

    let same_tracking = validate_new_order(&new_order("GINEE-2", "jne100")).unwrap();
    let err: PersistenceError = fx
        .persistence
        .execute(
            Command::CreateOrder {
                order: same_tracking,
            },
            &create_test_context(fx.admin),
        )
        .unwrap_err();
    assert_eq!(rejection_kind(&err), ErrorKind::Conflict);

    assert!(!fx
        .persistence
        .tracking_number_exists(&tracking("JNE101"))
        .unwrap());
}

#[test]
fn test_unknown_targets_are_not_found() {
    let mut fx = setup();
    let ctx = create_test_context(fx.admin);

    let err = fx
        .persistence
        .execute(Command::CancelOrder { order_id: 404 }, &ctx)
        .unwrap_err();
    assert_eq!(rejection_kind(&err), ErrorKind::NotFound);

    let err = fx
        .persistence
        .execute(
            Command::StartQc {
                lane: QcLane::Ribbon,
                tracking_number: tracking("JNE404"),
            },
            &ctx,
        )
        .unwrap_err();
    assert_eq!(rejection_kind(&err), ErrorKind::NotFound);

    let err = fx
        .persistence
        .execute(
            Command::AssignPicker {
                tracking_number: tracking("JNE404"),
                picker_id: fx.picker,
            },
            &ctx,
        )
        .unwrap_err();
    assert_eq!(rejection_kind(&err), ErrorKind::NotFound);
}

#[test]
fn test_storage_failure_mid_plan_rolls_back_earlier_writes() {
    let mut fx = setup();
    let order_id: i64 = {
        create_qc_completed(&mut fx, QcLane::Ribbon, "GINEE-1", "JNE200");
        shipment(&mut fx, "JNE200").order.unwrap().order_id.unwrap()
    };
    let events_before: usize = timeline_len(&mut fx, "JNE200");

    // A stray QC row already holds the tracking number the duplicate would
    // move the original QC record to. The order rename succeeds, then the
    // QC rename hits the unique index.
    match &mut fx.persistence.conn {
        BackendConnection::Sqlite(conn) => {
            diesel::sql_query(
                "INSERT INTO qc_records \
                 (lane, tracking_number, qc_by, status, complained, created_at, updated_at) \
                 VALUES ('online', 'X-JNE200', 1, 'pending', 0, \
                 '2026-03-02T08:15:00Z', '2026-03-02T08:15:00Z')",
            )
            .execute(conn)
            .unwrap();
        }
        BackendConnection::Mysql(_) => unreachable!("tests run on SQLite"),
    }

    let err: PersistenceError = fx
        .persistence
        .execute(
            Command::DuplicateOrder { order_id },
            &create_test_context(fx.admin),
        )
        .unwrap_err();
    assert!(matches!(err, PersistenceError::UniqueViolation(_)));

    let state = shipment(&mut fx, "JNE200");
    let order = state.order.unwrap();
    assert_eq!(order.order_id, Some(order_id));
    assert_eq!(order.order_ginee_id.value(), "GINEE-1");
    assert_eq!(order.event_status, EventStatus::InProgress);
    assert_eq!(state.qc.unwrap().status, QcStatus::Completed);
    assert!(!fx
        .persistence
        .order_ginee_id_exists("GINEE-1-X2")
        .unwrap());
    assert_eq!(timeline_len(&mut fx, "JNE200"), events_before);
}

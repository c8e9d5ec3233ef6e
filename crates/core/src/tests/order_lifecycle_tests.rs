// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    ORDER_ID, PICKER, create_test_context, create_test_lookups, expect_applied, expect_kind,
    now, order_only, shipment_at,
};
use crate::{Command, CoreError, Lookups, Mutation, ShipmentState, TransitionResult, apply};
use fulfillment_domain::{
    DomainError, ErrorKind, EventStatus, NewOrder, NewOrderDetail, ProcessingStatus,
    TrackingNumber, validate_new_order,
};
use time::macros::datetime;

fn create_command() -> Command {
    let order: NewOrder = NewOrder {
        order_ginee_id: String::from("G-200"),
        tracking_number: String::from(" jne200 "),
        buyer_name: String::from("Buyer"),
        address: String::from("Street 2"),
        courier: String::from("JNE"),
        sent_before: Some(datetime!(2026-02-14 00:00 UTC)),
        details: vec![NewOrderDetail {
            sku: String::from("SKU-A"),
            product_name: String::from("Widget"),
            variant: None,
            quantity: 1,
            price: 1000,
        }],
    };
    Command::CreateOrder {
        order: validate_new_order(&order).unwrap(),
    }
}

#[test]
fn test_create_order_starts_ready_to_pick() {
    let result: TransitionResult = expect_applied(apply(
        &ShipmentState::empty(),
        &create_test_lookups(),
        create_command(),
        &create_test_context(1),
    ));

    let order = result.after.order.unwrap();
    assert_eq!(order.processing_status, ProcessingStatus::ReadyToPick);
    assert_eq!(order.event_status, EventStatus::InProgress);
    assert_eq!(order.tracking_number.value(), "JNE200");
    assert_eq!(order.created_by, 1);
    assert!(matches!(result.mutations.as_slice(), [Mutation::InsertOrder(_)]));
    assert_eq!(result.audit_event.action.name, "CreateOrder");
    assert_eq!(result.audit_event.tracking_number.value(), "JNE200");
}

#[test]
fn test_create_order_rejects_taken_order_id() {
    let mut lookups: Lookups = create_test_lookups();
    lookups.order_ginee_id_taken = true;

    let err: CoreError = expect_kind(
        apply(
            &ShipmentState::empty(),
            &lookups,
            create_command(),
            &create_test_context(1),
        ),
        ErrorKind::Conflict,
    );
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::DuplicateOrderGineeId(_))
    ));
}

#[test]
fn test_create_order_rejects_taken_tracking_number() {
    let state: ShipmentState = order_only(ProcessingStatus::ReadyToPick, EventStatus::InProgress);

    let err: CoreError = expect_kind(
        apply(
            &state,
            &create_test_lookups(),
            create_command(),
            &create_test_context(1),
        ),
        ErrorKind::Conflict,
    );
    assert!(matches!(
        err,
        CoreError::DomainViolation(DomainError::DuplicateTrackingNumber(_))
    ));
}

#[test]
fn test_assign_picker_records_picker_and_assigner() {
    let state: ShipmentState = order_only(ProcessingStatus::ReadyToPick, EventStatus::InProgress);
    let command: Command = Command::AssignPicker {
        tracking_number: TrackingNumber::new("jne100").unwrap(),
        picker_id: PICKER,
    };

    let result: TransitionResult = expect_applied(apply(
        &state,
        &create_test_lookups(),
        command,
        &create_test_context(2),
    ));

    let order = result.after.order.unwrap();
    assert_eq!(order.processing_status, ProcessingStatus::PickingProgress);
    assert_eq!(order.picked_by, Some(PICKER));
    assert_eq!(order.assigned_by, Some(2));
    assert_eq!(order.assigned_at, Some(now()));
    assert_eq!(order.changed_by, Some(2));
}

#[test]
fn test_assign_picker_unknown_order_is_not_found() {
    let command: Command = Command::AssignPicker {
        tracking_number: TrackingNumber::new("NOPE1").unwrap(),
        picker_id: PICKER,
    };
    expect_kind(
        apply(
            &ShipmentState::empty(),
            &create_test_lookups(),
            command,
            &create_test_context(2),
        ),
        ErrorKind::NotFound,
    );
}

#[test]
fn test_assign_picker_unknown_user_is_not_found() {
    let state: ShipmentState = order_only(ProcessingStatus::ReadyToPick, EventStatus::InProgress);
    let command: Command = Command::AssignPicker {
        tracking_number: TrackingNumber::new("JNE100").unwrap(),
        picker_id: 404,
    };
    let err: CoreError = expect_kind(
        apply(&state, &create_test_lookups(), command, &create_test_context(2)),
        ErrorKind::NotFound,
    );
    assert_eq!(err, CoreError::DomainViolation(DomainError::UserNotFound(404)));
}

#[test]
fn test_assign_picker_rejects_canceled_order() {
    let state: ShipmentState = order_only(ProcessingStatus::ReadyToPick, EventStatus::Canceled);
    let command: Command = Command::AssignPicker {
        tracking_number: TrackingNumber::new("JNE100").unwrap(),
        picker_id: PICKER,
    };
    expect_kind(
        apply(&state, &create_test_lookups(), command, &create_test_context(2)),
        ErrorKind::InvalidState,
    );
}

#[test]
fn test_mark_pending_fully_unassigns() {
    let state: ShipmentState =
        order_only(ProcessingStatus::PickingProgress, EventStatus::InProgress);

    let result: TransitionResult = expect_applied(apply(
        &state,
        &create_test_lookups(),
        Command::MarkPendingPicking { order_id: ORDER_ID },
        &create_test_context(2),
    ));

    let order = result.after.order.unwrap();
    assert_eq!(order.processing_status, ProcessingStatus::PickingPending);
    assert_eq!(order.picked_by, None);
    assert_eq!(order.assigned_by, None);
    assert_eq!(order.assigned_at, None);
    assert_eq!(order.pending_by, Some(2));
    assert_eq!(order.pending_at, Some(now()));
}

#[test]
fn test_pending_order_can_be_reassigned() {
    let state: ShipmentState = order_only(ProcessingStatus::PickingPending, EventStatus::InProgress);
    let command: Command = Command::AssignPicker {
        tracking_number: TrackingNumber::new("JNE100").unwrap(),
        picker_id: 6,
    };
    let result: TransitionResult = expect_applied(apply(
        &state,
        &create_test_lookups(),
        command,
        &create_test_context(2),
    ));
    assert_eq!(result.after.order.unwrap().picked_by, Some(6));
}

#[test]
fn test_complete_picking_appends_log_row_in_same_plan() {
    let state: ShipmentState =
        order_only(ProcessingStatus::PickingProgress, EventStatus::InProgress);

    let result: TransitionResult = expect_applied(apply(
        &state,
        &create_test_lookups(),
        Command::CompletePicking { order_id: ORDER_ID },
        &create_test_context(PICKER),
    ));

    let order = result.after.order.unwrap();
    assert_eq!(order.processing_status, ProcessingStatus::PickingCompleted);
    assert_eq!(order.picked_at, Some(now()));
    match result.mutations.as_slice() {
        [Mutation::UpdateOrder(_), Mutation::AppendPickedOrder(entry)] => {
            assert_eq!(entry.order_id, ORDER_ID);
            assert_eq!(entry.picked_by, Some(PICKER));
            assert_eq!(entry.completed_by, PICKER);
        }
        other => panic!("unexpected mutations {other:?}"),
    }
}

#[test]
fn test_cancel_zeroes_quantities_and_keeps_lines() {
    let state: ShipmentState = shipment_at(ProcessingStatus::QcCompleted, EventStatus::InProgress);

    let result: TransitionResult = expect_applied(apply(
        &state,
        &create_test_lookups(),
        Command::CancelOrder { order_id: ORDER_ID },
        &create_test_context(1),
    ));

    let order = result.after.order.unwrap();
    assert_eq!(order.event_status, EventStatus::Canceled);
    assert_eq!(order.canceled_by, Some(1));
    assert_eq!(order.processing_status, ProcessingStatus::QcCompleted);
    assert_eq!(order.details.len(), 2);
    assert!(order.details.iter().all(|d| d.quantity == 0));
    assert!(
        result
            .mutations
            .iter()
            .any(|m| matches!(m, Mutation::UpdateOrderDetails(d) if d.len() == 2))
    );
}

#[test]
fn test_cancel_twice_is_invalid_state() {
    let state: ShipmentState = order_only(ProcessingStatus::ReadyToPick, EventStatus::Canceled);
    expect_kind(
        apply(
            &state,
            &create_test_lookups(),
            Command::CancelOrder { order_id: ORDER_ID },
            &create_test_context(1),
        ),
        ErrorKind::InvalidState,
    );
}

#[test]
fn test_duplicate_renames_original_and_recreates_it() {
    let state: ShipmentState = shipment_at(ProcessingStatus::QcCompleted, EventStatus::InProgress);

    let result: TransitionResult = expect_applied(apply(
        &state,
        &create_test_lookups(),
        Command::DuplicateOrder { order_id: ORDER_ID },
        &create_test_context(1),
    ));

    let renamed = result.renamed.clone().unwrap();
    let original = renamed.order.unwrap();
    assert_eq!(original.order_id, Some(ORDER_ID));
    assert_eq!(original.tracking_number.value(), "X-JNE100");
    assert_eq!(original.order_ginee_id.value(), "G-100-X2");
    assert_eq!(original.event_status, EventStatus::Duplicated);
    assert_eq!(
        renamed.qc.unwrap().tracking_number.value(),
        "X-JNE100",
        "QC row follows the renamed order"
    );

    let fresh = result.after.order.unwrap();
    assert_eq!(fresh.order_id, None);
    assert_eq!(fresh.tracking_number.value(), "JNE100");
    assert_eq!(fresh.order_ginee_id.value(), "G-100");
    assert_eq!(fresh.event_status, EventStatus::Duplicated);
    assert_eq!(fresh.processing_status, ProcessingStatus::ReadyToPick);
    assert_eq!(fresh.duplicated_by, Some(1));
    assert_eq!(fresh.details.len(), 2);
    assert!(fresh.details.iter().all(|d| !d.is_valid && d.order_detail_id.is_none()));
    assert!(result.after.qc.is_none());

    assert!(matches!(
        result.mutations.as_slice(),
        [
            Mutation::UpdateOrder(_),
            Mutation::RenameShipment { .. },
            Mutation::InsertOrder(_)
        ]
    ));
    assert_eq!(result.audit_event.tracking_number.value(), "JNE100");
}

#[test]
fn test_duplicate_twice_is_invalid_state() {
    let state: ShipmentState = order_only(ProcessingStatus::ReadyToPick, EventStatus::Duplicated);
    expect_kind(
        apply(
            &state,
            &create_test_lookups(),
            Command::DuplicateOrder { order_id: ORDER_ID },
            &create_test_context(1),
        ),
        ErrorKind::InvalidState,
    );
}

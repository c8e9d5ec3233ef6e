// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order lifecycle handlers: create, assign, pick, cancel, duplicate.

use fulfillment_domain::{EventStatus, ProcessingStatus};

use crate::{
    ApiError, AssignPickerRequest, CreateOrderRequest, OperationResponse, OrderInfo,
    ShipmentInfo, assign_picker, cancel_order, complete_picking, create_order, duplicate_order,
    get_audit_timeline, get_shipment, list_picked_orders, mark_pending_picking,
};

use super::helpers::{
    create_order_request, create_picked_order, create_test_order, ctx, setup,
};

fn order_of(response: &OperationResponse) -> &OrderInfo {
    response
        .shipment
        .as_ref()
        .and_then(|s| s.order.as_ref())
        .expect("response carries the order")
}

// ============================================================================
// Create
// ============================================================================

#[test]
fn test_create_order_returns_stored_order() {
    let mut env = setup();
    let response: OperationResponse = create_order(
        &mut env.persistence,
        &create_order_request("GINEE-100", " jne100 "),
        &ctx(env.admin),
    )
    .unwrap();

    assert!(response.applied);
    assert!(response.event_id.is_some());
    let order: &OrderInfo = order_of(&response);
    assert_eq!(order.tracking_number, "JNE100");
    assert_eq!(order.processing_status, ProcessingStatus::ReadyToPick);
    assert_eq!(order.event_status, EventStatus::InProgress);
    assert_eq!(order.created_by, env.admin);
    assert_eq!(order.details.len(), 2);
    assert!(order.details.iter().all(|d| d.order_detail_id.is_some()));
    assert!(order.details.iter().all(|d| !d.is_valid));
}

#[test]
fn test_create_order_without_deadline_is_rejected() {
    let mut env = setup();
    let mut request: CreateOrderRequest = create_order_request("GINEE-101", "JNE101");
    request.sent_before = None;

    let err: ApiError = create_order(&mut env.persistence, &request, &ctx(env.admin)).unwrap_err();
    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "sent_before"
    ));
}

#[test]
fn test_create_order_with_malformed_deadline_is_rejected() {
    let mut env = setup();
    let mut request: CreateOrderRequest = create_order_request("GINEE-102", "JNE102");
    request.sent_before = Some(String::from("next tuesday"));

    let err: ApiError = create_order(&mut env.persistence, &request, &ctx(env.admin)).unwrap_err();
    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "sent_before"
    ));
}

#[test]
fn test_create_order_without_details_is_rejected() {
    let mut env = setup();
    let mut request: CreateOrderRequest = create_order_request("GINEE-103", "JNE103");
    request.details.clear();

    let err: ApiError = create_order(&mut env.persistence, &request, &ctx(env.admin)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { .. }));
    assert!(get_shipment(&mut env.persistence, "JNE103").is_err());
}

#[test]
fn test_create_order_conflicts_on_taken_identifiers() {
    let mut env = setup();
    create_test_order(&mut env, "GINEE-104", "JNE104");

    let same_id: ApiError = create_order(
        &mut env.persistence,
        &create_order_request("GINEE-104", "JNE999"),
        &ctx(env.admin),
    )
    .unwrap_err();
    assert!(matches!(
        same_id,
        ApiError::Conflict { ref rule, .. } if rule == "unique_order_ginee_id"
    ));

    let same_tn: ApiError = create_order(
        &mut env.persistence,
        &create_order_request("GINEE-999", "jne104"),
        &ctx(env.admin),
    )
    .unwrap_err();
    assert!(matches!(
        same_tn,
        ApiError::Conflict { ref rule, .. } if rule == "unique_tracking_number"
    ));
}

// ============================================================================
// Picking
// ============================================================================

#[test]
fn test_assign_picker_records_picker() {
    let mut env = setup();
    create_test_order(&mut env, "GINEE-110", "JNE110");

    let response: OperationResponse = assign_picker(
        &mut env.persistence,
        &AssignPickerRequest {
            tracking_number: String::from("JNE110"),
            picker_id: env.picker,
        },
        &ctx(env.admin),
    )
    .unwrap();

    let order: &OrderInfo = order_of(&response);
    assert_eq!(order.processing_status, ProcessingStatus::PickingProgress);
    assert_eq!(order.picked_by, Some(env.picker));
    assert_eq!(order.assigned_by, Some(env.admin));
}

#[test]
fn test_assign_unknown_picker_is_not_found() {
    let mut env = setup();
    create_test_order(&mut env, "GINEE-111", "JNE111");

    let err: ApiError = assign_picker(
        &mut env.persistence,
        &AssignPickerRequest {
            tracking_number: String::from("JNE111"),
            picker_id: 9_999,
        },
        &ctx(env.admin),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ApiError::ResourceNotFound { ref resource_type, .. } if resource_type == "User"
    ));
}

#[test]
fn test_assign_picker_with_blank_tracking_number_is_invalid() {
    let mut env = setup();
    let err: ApiError = assign_picker(
        &mut env.persistence,
        &AssignPickerRequest {
            tracking_number: String::from("   "),
            picker_id: env.picker,
        },
        &ctx(env.admin),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { .. }));
}

#[test]
fn test_complete_picking_writes_picking_log() {
    let mut env = setup();
    let order_id: i64 = create_picked_order(&mut env, "GINEE-112", "JNE112");

    let shipment: ShipmentInfo = get_shipment(&mut env.persistence, "JNE112").unwrap();
    let order: OrderInfo = shipment.order.unwrap();
    assert_eq!(order.order_id, Some(order_id));
    assert_eq!(order.processing_status, ProcessingStatus::PickingCompleted);
    assert!(order.picked_at.is_some());

    let log = list_picked_orders(&mut env.persistence, "JNE112").unwrap();
    assert_eq!(log.entries.len(), 1);
    assert_eq!(log.entries[0].order_id, order_id);
    assert_eq!(log.entries[0].picked_by, Some(env.picker));
    assert_eq!(log.entries[0].completed_by, env.picker);
}

#[test]
fn test_complete_picking_before_assignment_is_invalid_state() {
    let mut env = setup();
    let order_id: i64 = create_test_order(&mut env, "GINEE-113", "JNE113");

    let err: ApiError =
        complete_picking(&mut env.persistence, order_id, &ctx(env.picker)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidState { .. }));
    assert!(
        list_picked_orders(&mut env.persistence, "JNE113")
            .unwrap()
            .entries
            .is_empty()
    );
}

#[test]
fn test_mark_pending_picking_clears_picker() {
    let mut env = setup();
    let order_id: i64 = create_test_order(&mut env, "GINEE-114", "JNE114");
    assign_picker(
        &mut env.persistence,
        &AssignPickerRequest {
            tracking_number: String::from("JNE114"),
            picker_id: env.picker,
        },
        &ctx(env.admin),
    )
    .unwrap();

    let response: OperationResponse =
        mark_pending_picking(&mut env.persistence, order_id, &ctx(env.picker)).unwrap();
    let order: &OrderInfo = order_of(&response);
    assert_eq!(order.processing_status, ProcessingStatus::PickingPending);
    assert_eq!(order.picked_by, None);
}

#[test]
fn test_unknown_order_id_is_not_found() {
    let mut env = setup();
    let err: ApiError =
        complete_picking(&mut env.persistence, 4_242, &ctx(env.picker)).unwrap_err();
    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
}

// ============================================================================
// Cancel and duplicate
// ============================================================================

#[test]
fn test_cancel_order_sets_event_status() {
    let mut env = setup();
    let order_id: i64 = create_test_order(&mut env, "GINEE-120", "JNE120");

    let response: OperationResponse =
        cancel_order(&mut env.persistence, order_id, &ctx(env.admin)).unwrap();
    let order: &OrderInfo = order_of(&response);
    assert_eq!(order.event_status, EventStatus::Canceled);
    assert_eq!(order.canceled_by, Some(env.admin));

    let again: ApiError = cancel_order(&mut env.persistence, order_id, &ctx(env.admin)).unwrap_err();
    assert!(matches!(again, ApiError::InvalidState { .. }));
}

#[test]
fn test_duplicate_order_returns_both_shipments() {
    let mut env = setup();
    let order_id: i64 = create_picked_order(&mut env, "GINEE-121", "JNE121");

    let response: OperationResponse =
        duplicate_order(&mut env.persistence, order_id, &ctx(env.admin)).unwrap();
    assert!(response.applied);

    let fresh: &OrderInfo = order_of(&response);
    assert_eq!(fresh.order_ginee_id, "GINEE-121");
    assert_eq!(fresh.tracking_number, "JNE121");
    assert_eq!(fresh.processing_status, ProcessingStatus::ReadyToPick);
    assert_ne!(fresh.order_id, Some(order_id));

    let renamed: OrderInfo = response.renamed.unwrap().order.unwrap();
    assert_eq!(renamed.order_id, Some(order_id));
    assert_eq!(renamed.order_ginee_id, "GINEE-121-X2");
    assert_eq!(renamed.tracking_number, "X-JNE121");
    assert_eq!(renamed.event_status, EventStatus::Duplicated);
    assert_eq!(renamed.duplicated_by, Some(env.admin));
}

#[test]
fn test_duplicate_of_in_flight_order_is_invalid_state() {
    let mut env = setup();
    let order_id: i64 = create_test_order(&mut env, "GINEE-122", "JNE122");
    assign_picker(
        &mut env.persistence,
        &AssignPickerRequest {
            tracking_number: String::from("JNE122"),
            picker_id: env.picker,
        },
        &ctx(env.admin),
    )
    .unwrap();

    let err: ApiError =
        duplicate_order(&mut env.persistence, order_id, &ctx(env.admin)).unwrap_err();
    assert!(matches!(err, ApiError::InvalidState { .. }));
}

// ============================================================================
// Audit
// ============================================================================

#[test]
fn test_audit_timeline_records_actor_and_cause() {
    let mut env = setup();
    create_picked_order(&mut env, "GINEE-130", "JNE130");

    let timeline = get_audit_timeline(&mut env.persistence, "jne130").unwrap();
    assert_eq!(timeline.tracking_number, "JNE130");
    let actions: Vec<&str> = timeline
        .events
        .iter()
        .map(|e| e.action_name.as_str())
        .collect();
    assert_eq!(actions, ["CreateOrder", "AssignPicker", "CompletePicking"]);

    let last = timeline.events.last().unwrap();
    assert_eq!(last.actor_id, env.picker);
    assert_eq!(last.actor_type, "user");
    assert_eq!(last.cause_id, "api-req-456");
    assert_eq!(last.occurred_at, "2026-03-02T09:30:00Z");
}

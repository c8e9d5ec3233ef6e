// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{
    create_picked_order, create_qc_completed, create_test_context, rejection_kind, run,
    setup, shipment, tracking,
};
use fulfillment::{Command, ShipmentState};
use fulfillment_domain::{Complaint, ErrorKind, QcLane};

fn file_complaint(tn: &str) -> Command {
    Command::FileComplaint {
        tracking_number: tracking(tn),
        channel_id: 2,
        store_id: 7,
        reason: String::from("Wrong variant shipped"),
    }
}

#[test]
fn test_complaint_after_outbound_charges_every_stage() {
    let mut fx = setup();
    let (admin, picker, qc_user, outbound_user) =
        (fx.admin, fx.picker, fx.qc_user, fx.outbound_user);
    create_qc_completed(&mut fx, QcLane::Ribbon, "GINEE-5", "JNE500");
    run(
        &mut fx,
        Command::CreateOutbound {
            tracking_number: tracking("JNE500"),
            manual_carrier: None,
        },
        outbound_user,
    );

    run(&mut fx, file_complaint("JNE500"), admin);

    let complaint: Complaint = fx
        .persistence
        .get_complaint(&tracking("JNE500"))
        .unwrap()
        .unwrap();
    let users: Vec<i64> = complaint.users.iter().map(|u| u.user_id).collect();
    let mut expected: Vec<i64> = vec![admin, picker, qc_user, outbound_user];
    expected.sort_unstable();
    assert_eq!(users, expected);
    assert!(complaint.users.iter().all(|u| u.fee_charge == 0));
    assert_eq!(complaint.products.len(), 2);
    assert_eq!(complaint.order_ginee_id.value(), "GINEE-5");
    assert_eq!(complaint.reason, "Wrong variant shipped");
    assert!(!complaint.checked);

    let state: ShipmentState = shipment(&mut fx, "JNE500");
    assert!(state.order.unwrap().complained);
    assert!(state.qc.unwrap().complained);
    assert!(state.outbound.unwrap().complained);
}

#[test]
fn test_complaint_before_qc_only_charges_picking() {
    let mut fx = setup();
    let (admin, picker) = (fx.admin, fx.picker);
    create_picked_order(&mut fx, "GINEE-5", "JNE500");

    run(&mut fx, file_complaint("JNE500"), admin);

    let complaint: Complaint = fx
        .persistence
        .get_complaint(&tracking("JNE500"))
        .unwrap()
        .unwrap();
    let users: Vec<i64> = complaint.users.iter().map(|u| u.user_id).collect();
    assert_eq!(users, vec![admin, picker]);

    let state: ShipmentState = shipment(&mut fx, "JNE500");
    assert!(state.order.unwrap().complained);
    assert!(state.qc.is_none());
    assert!(state.outbound.is_none());
}

#[test]
fn test_second_complaint_is_a_conflict() {
    let mut fx = setup();
    let admin: i64 = fx.admin;
    create_picked_order(&mut fx, "GINEE-5", "JNE500");
    run(&mut fx, file_complaint("JNE500"), admin);

    let err = fx
        .persistence
        .execute(file_complaint("JNE500"), &create_test_context(admin))
        .unwrap_err();
    assert_eq!(rejection_kind(&err), ErrorKind::Conflict);
}

#[test]
fn test_complaint_without_order_is_not_found() {
    let mut fx = setup();
    let err = fx
        .persistence
        .execute(file_complaint("JNE404"), &create_test_context(fx.admin))
        .unwrap_err();
    assert_eq!(rejection_kind(&err), ErrorKind::NotFound);
    assert!(fx.persistence.get_complaint(&tracking("JNE404")).unwrap().is_none());
}

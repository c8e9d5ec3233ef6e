// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, OrderGineeId, TrackingNumber};

#[test]
fn test_tracking_number_is_trimmed_and_uppercased() {
    let tn: TrackingNumber = TrackingNumber::new("  jne123 ").unwrap();
    assert_eq!(tn.value(), "JNE123");
}

#[test]
fn test_tracking_number_rejects_empty() {
    let result: Result<TrackingNumber, DomainError> = TrackingNumber::new("   ");
    assert!(matches!(result, Err(DomainError::InvalidTrackingNumber(_))));
}

#[test]
fn test_tracking_number_rejects_inner_whitespace() {
    let result: Result<TrackingNumber, DomainError> = TrackingNumber::new("JNE 123");
    assert!(matches!(result, Err(DomainError::InvalidTrackingNumber(_))));
}

#[test]
fn test_manual_carrier_detection() {
    assert!(TrackingNumber::new("tkp0123").unwrap().is_manual_carrier());
    assert!(!TrackingNumber::new("TKP1123").unwrap().is_manual_carrier());
}

#[test]
fn test_duplicated_identifiers() {
    let tn: TrackingNumber = TrackingNumber::new("T1").unwrap();
    assert_eq!(tn.duplicated().value(), "X-T1");

    let id: OrderGineeId = OrderGineeId::new(" G-100 ").unwrap();
    assert_eq!(id.value(), "G-100");
    assert_eq!(id.duplicated().value(), "G-100-X2");
}

#[test]
fn test_order_ginee_id_rejects_empty() {
    assert!(matches!(
        OrderGineeId::new(""),
        Err(DomainError::InvalidOrderGineeId(_))
    ));
}

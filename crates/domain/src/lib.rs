// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod expedition;
mod liability;
mod status;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::{DomainError, ErrorKind};
pub use expedition::{CarrierOverride, resolve_carrier};
pub use liability::{LiabilityAssessment, LiabilitySources, assess_liability};
pub use status::{
    EventStatus, ProcessingStatus, QcLane, QcStatus, validate_cancel, validate_duplicate,
    validate_picker_assignment,
};

// Re-export public types
pub use types::{
    Carrier, Complaint, ComplaintProduct, ComplaintUser, DUPLICATE_ORDER_SUFFIX,
    DUPLICATE_TRACKING_PREFIX, Expedition, MANUAL_CARRIER_PREFIX, NewOrder, NewOrderDetail, Order,
    OrderDetail, OrderGineeId, OutboundRecord, PackingBox, PickedOrderEntry, QcBoxDetail,
    QcRecord, TrackingNumber,
};
pub use validation::{
    ValidatedOrder, ensure_all_validated, validate_box_details, validate_new_order,
    validate_product,
};

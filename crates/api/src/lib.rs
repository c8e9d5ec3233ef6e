// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the fulfillment backend.
//!
//! This crate sits between transport (HTTP, tests) and the persistence
//! layer. It converts requests into core commands, maps every lower-level
//! error onto the stable `ApiError` contract and converts stored records
//! into response types.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod bulk;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use bulk::{bulk_create_orders, bulk_create_orders_from_csv};
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    assign_picker, cancel_order, complete_picking, complete_qc, create_order, create_outbound,
    duplicate_order, file_complaint, get_audit_timeline, get_complaint, get_shipment,
    list_expeditions, list_picked_orders, mark_pending_picking, mark_qc_pending, parse_lane,
    resume_qc, start_qc, validate_product,
};
pub use request_response::{
    AssignPickerRequest, AuditEventInfo, BoxDetail, BulkCreateOrdersCsvRequest,
    BulkCreateOrdersRequest, BulkCreateOrdersResponse, BulkItemResult, CompleteQcRequest,
    ComplaintInfo, ComplaintProductInfo, ComplaintUserInfo, CreateOrderRequest,
    CreateOutboundRequest, ExpeditionInfo, FileComplaintRequest, GetAuditTimelineResponse,
    ListExpeditionsResponse, ListPickedOrdersResponse, OperationResponse, OrderDetailInfo,
    OrderDetailInput, OrderInfo, OutboundInfo, PickedOrderInfo, QcInfo, ShipmentInfo,
    StartQcRequest, ValidateProductRequest,
};

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API layer.
//!
//! Timestamps cross this boundary as RFC 3339 strings.

use fulfillment_domain::{EventStatus, ProcessingStatus, QcLane, QcStatus};

// ========================================================================
// Requests
// ========================================================================

/// One order line as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrderDetailInput {
    pub sku: String,
    pub product_name: String,
    #[serde(default)]
    pub variant: Option<String>,
    pub quantity: i32,
    /// Unit price in the smallest currency unit.
    pub price: i64,
}

/// API request to create an order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateOrderRequest {
    /// The marketplace order id.
    pub order_ginee_id: String,
    pub tracking_number: String,
    pub buyer_name: String,
    pub address: String,
    pub courier: String,
    /// The shipping deadline (RFC 3339). Required.
    #[serde(default)]
    pub sent_before: Option<String>,
    pub details: Vec<OrderDetailInput>,
}

/// API request to assign a picker.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignPickerRequest {
    pub tracking_number: String,
    /// The user who will pick the order.
    pub picker_id: i64,
}

/// API request to open a QC record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StartQcRequest {
    pub tracking_number: String,
}

/// API request to scan one order line during QC.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidateProductRequest {
    pub sku: String,
    pub quantity: i32,
}

/// A box type and how many of it a shipment was packed into.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoxDetail {
    pub box_id: i64,
    pub quantity: i32,
}

/// API request to complete QC.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CompleteQcRequest {
    pub boxes: Vec<BoxDetail>,
}

/// API request to register an outbound shipment.
///
/// The carrier fields are only read for manual-carrier tracking numbers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateOutboundRequest {
    pub tracking_number: String,
    #[serde(default)]
    pub expedition: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// API request to file a complaint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FileComplaintRequest {
    pub tracking_number: String,
    pub channel_id: i64,
    pub store_id: i64,
    pub reason: String,
}

/// API request to create many orders at once.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BulkCreateOrdersRequest {
    pub orders: Vec<CreateOrderRequest>,
}

/// API request to create orders from CSV content.
///
/// One row per order line; rows sharing an `order_ginee_id` form one order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BulkCreateOrdersCsvRequest {
    pub csv_content: String,
}

// ========================================================================
// Responses
// ========================================================================

/// API representation of an order line.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrderDetailInfo {
    pub order_detail_id: Option<i64>,
    pub sku: String,
    pub product_name: String,
    pub variant: Option<String>,
    pub quantity: i32,
    pub price: i64,
    /// Whether QC has scanned this line.
    pub is_valid: bool,
}

/// API representation of an order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrderInfo {
    pub order_id: Option<i64>,
    pub order_ginee_id: String,
    pub tracking_number: String,
    pub buyer_name: String,
    pub address: String,
    pub courier: String,
    pub processing_status: ProcessingStatus,
    pub event_status: EventStatus,
    pub sent_before: String,
    pub assigned_by: Option<i64>,
    pub picked_by: Option<i64>,
    pub picked_at: Option<String>,
    pub duplicated_by: Option<i64>,
    pub canceled_by: Option<i64>,
    pub complained: bool,
    pub created_by: i64,
    pub created_at: String,
    pub details: Vec<OrderDetailInfo>,
}

/// API representation of a QC record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QcInfo {
    pub qc_id: Option<i64>,
    pub lane: QcLane,
    pub tracking_number: String,
    pub qc_by: i64,
    pub status: QcStatus,
    pub complained: bool,
    pub created_at: String,
    pub updated_at: String,
    pub boxes: Vec<BoxDetail>,
}

/// API representation of an outbound record.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutboundInfo {
    pub outbound_id: Option<i64>,
    pub tracking_number: String,
    pub outbound_by: i64,
    pub expedition: String,
    pub expedition_slug: String,
    pub expedition_color: String,
    pub complained: bool,
    pub created_at: String,
}

/// A user held liable by a complaint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ComplaintUserInfo {
    pub user_id: i64,
    pub fee_charge: i64,
}

/// An order line as it stood when the complaint was filed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ComplaintProductInfo {
    pub sku: String,
    pub product_name: String,
    pub variant: Option<String>,
    pub quantity: i32,
    pub price: i64,
}

/// API representation of a complaint.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ComplaintInfo {
    pub complaint_id: Option<i64>,
    pub tracking_number: String,
    pub order_ginee_id: String,
    pub channel_id: i64,
    pub store_id: i64,
    pub reason: String,
    pub total_fee: Option<i64>,
    pub solution: Option<String>,
    pub checked: bool,
    pub created_by: i64,
    pub created_at: String,
    pub users: Vec<ComplaintUserInfo>,
    pub products: Vec<ComplaintProductInfo>,
}

/// Everything stored under one tracking number.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShipmentInfo {
    pub tracking_number: String,
    pub order: Option<OrderInfo>,
    pub qc: Option<QcInfo>,
    pub outbound: Option<OutboundInfo>,
    pub complaint: Option<ComplaintInfo>,
}

/// API response for every state-changing operation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OperationResponse {
    /// False when the request was accepted but nothing needed writing.
    pub applied: bool,
    /// The audit event recording the change.
    pub event_id: Option<i64>,
    pub message: String,
    /// The affected shipment as now stored.
    pub shipment: Option<ShipmentInfo>,
    /// For a duplicated order, the original under its new tracking number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renamed: Option<ShipmentInfo>,
}

/// One picking log entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PickedOrderInfo {
    pub order_id: i64,
    pub tracking_number: String,
    pub picked_by: Option<i64>,
    pub completed_by: i64,
    pub picked_at: String,
}

/// API response for the picking log of a tracking number.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListPickedOrdersResponse {
    pub tracking_number: String,
    pub entries: Vec<PickedOrderInfo>,
}

/// API representation of an audit event.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEventInfo {
    pub event_id: Option<i64>,
    pub tracking_number: String,
    pub actor_id: i64,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action_name: String,
    pub action_details: Option<String>,
    pub before_snapshot: String,
    pub after_snapshot: String,
    pub occurred_at: String,
}

/// API response for the audit timeline of a tracking number, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GetAuditTimelineResponse {
    pub tracking_number: String,
    pub events: Vec<AuditEventInfo>,
}

/// API representation of a configured carrier.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExpeditionInfo {
    pub expedition_id: i64,
    /// Tracking number prefix.
    pub code: String,
    pub name: String,
    pub slug: String,
    pub color: String,
}

/// API response listing the configured carriers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListExpeditionsResponse {
    pub expeditions: Vec<ExpeditionInfo>,
}

/// The outcome for one order of a bulk request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BulkItemResult {
    /// The order id as submitted, when one could be read.
    pub order_ginee_id: Option<String>,
    pub tracking_number: Option<String>,
    /// Set for created orders.
    pub order_id: Option<i64>,
    /// Why the order was skipped or failed.
    pub reason: Option<String>,
}

/// API response for bulk order creation.
///
/// The buckets are independent: a failure never undoes a creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BulkCreateOrdersResponse {
    /// Number of orders submitted.
    pub total: usize,
    pub created_count: usize,
    pub skipped_count: usize,
    pub failed_count: usize,
    pub created: Vec<BulkItemResult>,
    /// Orders that already existed.
    pub skipped: Vec<BulkItemResult>,
    /// Orders that could not be created; safe to retry after fixing.
    pub failed: Vec<BulkItemResult>,
}

impl BulkCreateOrdersResponse {
    /// Returns true if a non-empty batch had every order skipped.
    #[must_use]
    pub const fn all_skipped(&self) -> bool {
        self.total > 0 && self.skipped_count == self.total
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::status::{EventStatus, ProcessingStatus, QcLane, QcStatus};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Tracking numbers with this prefix carry caller-supplied carrier data.
pub const MANUAL_CARRIER_PREFIX: &str = "TKP0";

/// Prefix applied to the tracking number of an order moved aside by duplication.
pub const DUPLICATE_TRACKING_PREFIX: &str = "X-";

/// Suffix applied to the external order id of an order moved aside by duplication.
pub const DUPLICATE_ORDER_SUFFIX: &str = "-X2";

/// A carrier-assigned shipment identifier.
///
/// Tracking numbers are the join key across orders, QC records and
/// outbound records. They are normalized to trimmed upper case so that
/// scanner input and ingest input compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackingNumber(String);

impl TrackingNumber {
    /// Creates a normalized tracking number.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTrackingNumber` if the value is empty
    /// or contains whitespace.
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let normalized: String = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(DomainError::InvalidTrackingNumber(String::from(
                "Tracking number cannot be empty",
            )));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidTrackingNumber(format!(
                "Tracking number '{normalized}' must not contain whitespace"
            )));
        }
        Ok(Self(normalized))
    }

    /// Wraps a value read back from storage without re-validating it.
    #[must_use]
    pub const fn from_persisted(value: String) -> Self {
        Self(value)
    }

    /// Returns the normalized value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Returns true if carrier data must be supplied by the caller.
    #[must_use]
    pub fn is_manual_carrier(&self) -> bool {
        self.0.starts_with(MANUAL_CARRIER_PREFIX)
    }

    /// Returns the tracking number an original order is renamed to when duplicated.
    #[must_use]
    pub fn duplicated(&self) -> Self {
        Self(format!("{DUPLICATE_TRACKING_PREFIX}{}", self.0))
    }
}

impl std::fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The external (marketplace) order identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderGineeId(String);

impl OrderGineeId {
    /// Creates a trimmed order id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidOrderGineeId` if the value is empty.
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let trimmed: &str = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidOrderGineeId(String::from(
                "Order id cannot be empty",
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wraps a value read back from storage without re-validating it.
    #[must_use]
    pub const fn from_persisted(value: String) -> Self {
        Self(value)
    }

    /// Returns the order id value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.0
    }

    /// Returns the id an original order is renamed to when duplicated.
    #[must_use]
    pub fn duplicated(&self) -> Self {
        Self(format!("{}{DUPLICATE_ORDER_SUFFIX}", self.0))
    }
}

impl std::fmt::Display for OrderGineeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// Database id, `None` until persisted.
    pub order_detail_id: Option<i64>,
    pub sku: String,
    pub product_name: String,
    pub variant: Option<String>,
    pub quantity: i32,
    /// Unit price in minor currency units.
    pub price: i64,
    /// Set once QC has scanned this SKU with the right quantity.
    pub is_valid: bool,
}

/// A purchase order and its audit stamps.
///
/// Each `*_by` field references a user id; each `*_at` field is the time
/// the matching action happened. `picked_by` is set when a picker is
/// assigned, `picked_at` when picking completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Database id, `None` until persisted.
    pub order_id: Option<i64>,
    pub order_ginee_id: OrderGineeId,
    pub tracking_number: TrackingNumber,
    pub buyer_name: String,
    pub address: String,
    pub courier: String,
    pub processing_status: ProcessingStatus,
    pub event_status: EventStatus,
    /// Shipping deadline.
    pub sent_before: OffsetDateTime,
    pub assigned_by: Option<i64>,
    pub assigned_at: Option<OffsetDateTime>,
    pub picked_by: Option<i64>,
    pub picked_at: Option<OffsetDateTime>,
    pub pending_by: Option<i64>,
    pub pending_at: Option<OffsetDateTime>,
    pub changed_by: Option<i64>,
    pub changed_at: Option<OffsetDateTime>,
    pub duplicated_by: Option<i64>,
    pub duplicated_at: Option<OffsetDateTime>,
    pub canceled_by: Option<i64>,
    pub canceled_at: Option<OffsetDateTime>,
    pub complained: bool,
    pub created_by: i64,
    pub created_at: OffsetDateTime,
    pub details: Vec<OrderDetail>,
}

impl Order {
    /// Returns the database id or an error naming the order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OrderNotFound` if the order was never persisted.
    pub fn persisted_id(&self) -> Result<i64, DomainError> {
        self.order_id.ok_or_else(|| {
            DomainError::OrderNotFound(format!("tracking number '{}'", self.tracking_number))
        })
    }

    /// Records the acting user and time as the last change.
    pub const fn touch(&mut self, actor: i64, at: OffsetDateTime) {
        self.changed_by = Some(actor);
        self.changed_at = Some(at);
    }
}

/// Raw order line as submitted by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderDetail {
    pub sku: String,
    pub product_name: String,
    pub variant: Option<String>,
    pub quantity: i32,
    pub price: i64,
}

/// Raw order as submitted by a caller, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_ginee_id: String,
    pub tracking_number: String,
    pub buyer_name: String,
    pub address: String,
    pub courier: String,
    pub sent_before: Option<OffsetDateTime>,
    pub details: Vec<NewOrderDetail>,
}

/// One box a shipment was packed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QcBoxDetail {
    pub box_id: i64,
    pub quantity: i32,
}

/// A QC record for one tracking number in one lane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QcRecord {
    /// Database id, `None` until persisted.
    pub qc_id: Option<i64>,
    pub lane: QcLane,
    pub tracking_number: TrackingNumber,
    pub qc_by: i64,
    pub status: QcStatus,
    pub complained: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    /// Written once, when the record completes.
    pub boxes: Vec<QcBoxDetail>,
}

/// Denormalized carrier information stored on an outbound record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carrier {
    pub expedition: String,
    pub slug: String,
    pub color: String,
}

/// The outbound (hand-over to carrier) record of a shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundRecord {
    /// Database id, `None` until persisted.
    pub outbound_id: Option<i64>,
    pub tracking_number: TrackingNumber,
    pub outbound_by: i64,
    pub carrier: Carrier,
    pub complained: bool,
    pub created_at: OffsetDateTime,
}

/// A configured carrier, matched against tracking numbers by prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expedition {
    pub expedition_id: i64,
    /// Tracking-number prefix identifying this carrier.
    pub code: String,
    pub name: String,
    pub slug: String,
    pub color: String,
}

/// A packing container type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingBox {
    pub box_id: i64,
    pub name: String,
}

/// A staff member charged by a complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintUser {
    pub user_id: i64,
    /// Fee charged to this user; zero until a reviewer assigns one.
    pub fee_charge: i64,
}

/// An order line as it was when the complaint was filed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintProduct {
    pub sku: String,
    pub product_name: String,
    pub variant: Option<String>,
    pub quantity: i32,
    pub price: i64,
}

/// A complaint filed against a shipped order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
    /// Database id, `None` until persisted.
    pub complaint_id: Option<i64>,
    pub tracking_number: TrackingNumber,
    pub order_ginee_id: OrderGineeId,
    pub channel_id: i64,
    pub store_id: i64,
    pub reason: String,
    pub total_fee: Option<i64>,
    pub solution: Option<String>,
    pub checked: bool,
    pub created_by: i64,
    pub created_at: OffsetDateTime,
    pub users: Vec<ComplaintUser>,
    pub products: Vec<ComplaintProduct>,
}

/// Append-only log row written each time picking completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedOrderEntry {
    pub order_id: i64,
    pub tracking_number: TrackingNumber,
    pub picked_by: Option<i64>,
    pub completed_by: i64,
    pub picked_at: OffsetDateTime,
}

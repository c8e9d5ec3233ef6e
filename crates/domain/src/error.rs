// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::status::QcLane;

/// Coarse classification of a domain failure.
///
/// Every `DomainError` maps onto exactly one kind. The API layer uses the
/// kind to choose a transport status; callers use the variant for the
/// specific message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input.
    Validation,
    /// A uniqueness rule was violated.
    Conflict,
    /// A referenced order, QC record, box or user is absent.
    NotFound,
    /// The operation is not legal from the current status.
    InvalidState,
    /// A gating precondition is unmet.
    Incomplete,
    /// A reference-data lookup produced no match.
    ExternalLookupFailure,
}

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Tracking number is empty or invalid.
    InvalidTrackingNumber(String),
    /// External order id is empty or invalid.
    InvalidOrderGineeId(String),
    /// A required field was not supplied.
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },
    /// An order detail line is malformed.
    InvalidOrderDetail {
        /// The SKU of the offending line (may be empty).
        sku: String,
        /// Why the line was rejected.
        reason: String,
    },
    /// A persisted status string could not be parsed.
    InvalidStatus {
        /// The status family (processing, event, qc, lane).
        family: &'static str,
        /// The unparsable value.
        value: String,
    },
    /// An order with this external id already exists.
    DuplicateOrderGineeId(String),
    /// An order with this tracking number already exists.
    DuplicateTrackingNumber(String),
    /// No order matches the given reference.
    OrderNotFound(String),
    /// The referenced user does not exist.
    UserNotFound(i64),
    /// No QC record with this id exists in the lane.
    QcRecordNotFound {
        /// The lane that was searched.
        lane: QcLane,
        /// The QC record id.
        qc_id: i64,
    },
    /// QC was already started for this tracking number in the same lane.
    QcAlreadyStarted {
        /// The lane holding the existing record.
        lane: QcLane,
        /// The tracking number.
        tracking_number: String,
    },
    /// QC was already started for this tracking number in the other lane.
    CrossLaneConflict {
        /// The lane holding the existing record.
        existing: QcLane,
        /// The lane that was requested.
        requested: QcLane,
        /// The tracking number.
        tracking_number: String,
    },
    /// The operation is not permitted from the current status.
    InvalidTransition {
        /// The operation that was attempted.
        operation: &'static str,
        /// The current status.
        from: String,
        /// Why the operation is not permitted.
        reason: String,
    },
    /// The order has no detail line with this SKU.
    SkuNotFound {
        /// The SKU that was scanned.
        sku: String,
    },
    /// The scanned quantity differs from the ordered quantity.
    QuantityMismatch {
        /// The SKU that was scanned.
        sku: String,
        /// The ordered quantity.
        expected: i32,
        /// The scanned quantity.
        actual: i32,
    },
    /// Not every order detail has been validated yet.
    ValidationIncomplete {
        /// SKUs still awaiting validation.
        unvalidated_skus: Vec<String>,
    },
    /// QC completion was requested without any box.
    EmptyBoxDetails,
    /// The same box id appears more than once.
    DuplicateBoxId(i64),
    /// The referenced box does not exist.
    BoxNotFound(i64),
    /// A box quantity is zero or negative.
    InvalidBoxQuantity {
        /// The box id.
        box_id: i64,
        /// The rejected quantity.
        quantity: i32,
    },
    /// An outbound record already exists for this tracking number.
    OutboundAlreadyExists(String),
    /// No QC record exists for this tracking number.
    QcNotPerformed(String),
    /// A manual-carrier tracking number was submitted without carrier fields.
    MissingCarrierOverride {
        /// The tracking number.
        tracking_number: String,
    },
    /// No configured expedition prefix matches the tracking number.
    NoExpeditionFound(String),
    /// A complaint was already filed for this tracking number.
    ComplaintAlreadyFiled(String),
}

impl DomainError {
    /// Returns the taxonomy bucket for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTrackingNumber(_)
            | Self::InvalidOrderGineeId(_)
            | Self::MissingField { .. }
            | Self::InvalidOrderDetail { .. }
            | Self::InvalidStatus { .. }
            | Self::QuantityMismatch { .. }
            | Self::EmptyBoxDetails
            | Self::DuplicateBoxId(_)
            | Self::InvalidBoxQuantity { .. }
            | Self::MissingCarrierOverride { .. } => ErrorKind::Validation,
            Self::DuplicateOrderGineeId(_)
            | Self::DuplicateTrackingNumber(_)
            | Self::QcAlreadyStarted { .. }
            | Self::CrossLaneConflict { .. }
            | Self::OutboundAlreadyExists(_)
            | Self::ComplaintAlreadyFiled(_) => ErrorKind::Conflict,
            Self::OrderNotFound(_)
            | Self::UserNotFound(_)
            | Self::QcRecordNotFound { .. }
            | Self::SkuNotFound { .. }
            | Self::BoxNotFound(_)
            | Self::QcNotPerformed(_) => ErrorKind::NotFound,
            Self::InvalidTransition { .. } => ErrorKind::InvalidState,
            Self::ValidationIncomplete { .. } => ErrorKind::Incomplete,
            Self::NoExpeditionFound(_) => ErrorKind::ExternalLookupFailure,
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTrackingNumber(msg) => write!(f, "Invalid tracking number: {msg}"),
            Self::InvalidOrderGineeId(msg) => write!(f, "Invalid order id: {msg}"),
            Self::MissingField { field } => write!(f, "Missing required field '{field}'"),
            Self::InvalidOrderDetail { sku, reason } => {
                write!(f, "Invalid order detail '{sku}': {reason}")
            }
            Self::InvalidStatus { family, value } => {
                write!(f, "Invalid {family} status '{value}'")
            }
            Self::DuplicateOrderGineeId(id) => write!(f, "Order '{id}' already exists"),
            Self::DuplicateTrackingNumber(tn) => {
                write!(f, "Tracking number '{tn}' is already in use")
            }
            Self::OrderNotFound(reference) => write!(f, "Order not found for {reference}"),
            Self::UserNotFound(id) => write!(f, "User {id} not found"),
            Self::QcRecordNotFound { lane, qc_id } => {
                write!(f, "QC {lane} record {qc_id} not found")
            }
            Self::QcAlreadyStarted {
                lane,
                tracking_number,
            } => {
                write!(
                    f,
                    "QC {lane} already started for tracking number '{tracking_number}'"
                )
            }
            Self::CrossLaneConflict {
                existing,
                requested,
                tracking_number,
            } => {
                write!(
                    f,
                    "Cannot start QC {requested} for '{tracking_number}': already in QC {existing}"
                )
            }
            Self::InvalidTransition {
                operation,
                from,
                reason,
            } => {
                write!(f, "Cannot {operation} from status '{from}': {reason}")
            }
            Self::SkuNotFound { sku } => write!(f, "SKU '{sku}' is not part of this order"),
            Self::QuantityMismatch {
                sku,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "Quantity mismatch for SKU '{sku}': ordered {expected}, scanned {actual}"
                )
            }
            Self::ValidationIncomplete { unvalidated_skus } => {
                write!(
                    f,
                    "Not all products are validated; pending SKUs: {}",
                    unvalidated_skus.join(", ")
                )
            }
            Self::EmptyBoxDetails => write!(f, "At least one box is required"),
            Self::DuplicateBoxId(id) => write!(f, "Box {id} is listed more than once"),
            Self::BoxNotFound(id) => write!(f, "Box {id} not found"),
            Self::InvalidBoxQuantity { box_id, quantity } => {
                write!(
                    f,
                    "Invalid quantity {quantity} for box {box_id}. Must be greater than 0"
                )
            }
            Self::OutboundAlreadyExists(tn) => {
                write!(f, "Outbound already registered for tracking number '{tn}'")
            }
            Self::QcNotPerformed(tn) => {
                write!(f, "No QC record exists for tracking number '{tn}'")
            }
            Self::MissingCarrierOverride { tracking_number } => {
                write!(
                    f,
                    "Tracking number '{tracking_number}' requires expedition, slug and color"
                )
            }
            Self::NoExpeditionFound(tn) => {
                write!(f, "No expedition matches tracking number '{tn}'")
            }
            Self::ComplaintAlreadyFiled(tn) => {
                write!(f, "A complaint was already filed for tracking number '{tn}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}

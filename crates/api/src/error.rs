// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fulfillment::CoreError;
use fulfillment_domain::DomainError;
use fulfillment_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Every variant except `Internal` names the failing precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A uniqueness rule was violated.
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The operation is not legal from the current status.
    InvalidState {
        /// A human-readable description of the violation.
        message: String,
    },
    /// A gating precondition is unmet.
    Incomplete {
        /// A human-readable description of what is missing.
        message: String,
    },
    /// A reference-data lookup produced no match.
    ExternalLookupFailure {
        /// A human-readable description of the failed lookup.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Conflict { rule, message } => write!(f, "Conflict ({rule}): {message}"),
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidState { message } => write!(f, "Invalid state: {message}"),
            Self::Incomplete { message } => write!(f, "Incomplete: {message}"),
            Self::ExternalLookupFailure { message } => write!(f, "Lookup failed: {message}"),
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidTrackingNumber(msg) => ApiError::InvalidInput {
            field: String::from("tracking_number"),
            message: msg,
        },
        DomainError::InvalidOrderGineeId(msg) => ApiError::InvalidInput {
            field: String::from("order_ginee_id"),
            message: msg,
        },
        DomainError::MissingField { field } => ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("'{field}' is required"),
        },
        DomainError::InvalidOrderDetail { sku, reason } => ApiError::InvalidInput {
            field: String::from("details"),
            message: if sku.is_empty() {
                reason
            } else {
                format!("SKU '{sku}': {reason}")
            },
        },
        DomainError::InvalidStatus { family, value } => ApiError::Internal {
            message: format!("Stored {family} status '{value}' is not recognized"),
        },
        DomainError::QuantityMismatch {
            sku,
            expected,
            actual,
        } => ApiError::InvalidInput {
            field: String::from("quantity"),
            message: format!("SKU '{sku}' was ordered {expected} time(s), scanned {actual}"),
        },
        DomainError::EmptyBoxDetails => ApiError::InvalidInput {
            field: String::from("boxes"),
            message: String::from("At least one box is required"),
        },
        DomainError::DuplicateBoxId(box_id) => ApiError::InvalidInput {
            field: String::from("boxes"),
            message: format!("Box {box_id} is listed more than once"),
        },
        DomainError::InvalidBoxQuantity { box_id, quantity } => ApiError::InvalidInput {
            field: String::from("boxes"),
            message: format!("Box {box_id} quantity must be greater than 0, got {quantity}"),
        },
        DomainError::MissingCarrierOverride { tracking_number } => ApiError::InvalidInput {
            field: String::from("carrier"),
            message: format!(
                "Tracking number '{tracking_number}' needs expedition, slug and color supplied"
            ),
        },
        DomainError::DuplicateOrderGineeId(id) => ApiError::Conflict {
            rule: String::from("unique_order_ginee_id"),
            message: format!("Order '{id}' already exists"),
        },
        DomainError::DuplicateTrackingNumber(tn) => ApiError::Conflict {
            rule: String::from("unique_tracking_number"),
            message: format!("An order with tracking number '{tn}' already exists"),
        },
        DomainError::QcAlreadyStarted {
            lane,
            tracking_number,
        } => ApiError::Conflict {
            rule: String::from("single_qc_record"),
            message: format!("QC {lane} was already started for '{tracking_number}'"),
        },
        DomainError::CrossLaneConflict {
            existing,
            requested,
            tracking_number,
        } => ApiError::Conflict {
            rule: String::from("exclusive_qc_lane"),
            message: format!(
                "Cannot start QC {requested} for '{tracking_number}': QC {existing} already holds it"
            ),
        },
        DomainError::OutboundAlreadyExists(tn) => ApiError::Conflict {
            rule: String::from("single_outbound"),
            message: format!("Outbound already registered for '{tn}'"),
        },
        DomainError::ComplaintAlreadyFiled(tn) => ApiError::Conflict {
            rule: String::from("single_complaint"),
            message: format!("A complaint was already filed for '{tn}'"),
        },
        DomainError::OrderNotFound(reference) => ApiError::ResourceNotFound {
            resource_type: String::from("Order"),
            message: format!("No order matches {reference}"),
        },
        DomainError::UserNotFound(user_id) => ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {user_id} does not exist"),
        },
        DomainError::QcRecordNotFound { lane, qc_id } => ApiError::ResourceNotFound {
            resource_type: String::from("QC record"),
            message: format!("QC {lane} record {qc_id} does not exist"),
        },
        DomainError::SkuNotFound { sku } => ApiError::ResourceNotFound {
            resource_type: String::from("Order detail"),
            message: format!("SKU '{sku}' is not part of this order"),
        },
        DomainError::BoxNotFound(box_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Box"),
            message: format!("Box {box_id} does not exist"),
        },
        DomainError::QcNotPerformed(tn) => ApiError::ResourceNotFound {
            resource_type: String::from("QC record"),
            message: format!("QC never ran for '{tn}'"),
        },
        DomainError::InvalidTransition {
            operation,
            from,
            reason,
        } => ApiError::InvalidState {
            message: format!("Cannot {operation} from '{from}': {reason}"),
        },
        DomainError::ValidationIncomplete { unvalidated_skus } => ApiError::Incomplete {
            message: format!(
                "Every product must be validated first; pending: {}",
                unvalidated_skus.join(", ")
            ),
        },
        DomainError::NoExpeditionFound(tn) => ApiError::ExternalLookupFailure {
            message: format!("No expedition prefix matches '{tn}'"),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Rejections carry the domain reason. A unique index violation means a
/// concurrent writer got there first and is reported as a conflict. Every
/// other storage failure is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::Rejected(core_err) => translate_core_error(core_err),
        PersistenceError::UniqueViolation(msg) => ApiError::Conflict {
            rule: String::from("unique_index"),
            message: format!("A concurrent request already wrote this record: {msg}"),
        },
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: msg,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fulfillment_domain::QcLane;

    #[test]
    fn test_cross_lane_conflict_names_both_lanes() {
        let err: ApiError = translate_domain_error(DomainError::CrossLaneConflict {
            existing: QcLane::Online,
            requested: QcLane::Ribbon,
            tracking_number: String::from("JNE1"),
        });
        let ApiError::Conflict { rule, message } = err else {
            panic!("expected a conflict");
        };
        assert_eq!(rule, "exclusive_qc_lane");
        assert!(message.contains("online"));
        assert!(message.contains("ribbon"));
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let err: ApiError =
            translate_persistence_error(PersistenceError::UniqueViolation(String::from("orders")));
        assert!(matches!(err, ApiError::Conflict { .. }));
    }

    #[test]
    fn test_storage_failure_is_internal() {
        let err: ApiError =
            translate_persistence_error(PersistenceError::QueryFailed(String::from("boom")));
        assert!(matches!(err, ApiError::Internal { .. }));
    }

    #[test]
    fn test_incomplete_lists_pending_skus() {
        let err: ApiError = translate_domain_error(DomainError::ValidationIncomplete {
            unvalidated_skus: vec![String::from("SKU-A"), String::from("SKU-B")],
        });
        assert_eq!(
            err.to_string(),
            "Incomplete: Every product must be validated first; pending: SKU-A, SKU-B"
        );
    }
}

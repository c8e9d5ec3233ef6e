// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{NewOrder, OrderDetail, OrderGineeId, QcBoxDetail, TrackingNumber};
use std::collections::{BTreeSet, HashSet};
use time::OffsetDateTime;

/// A `NewOrder` after identifier normalization and field checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub order_ginee_id: OrderGineeId,
    pub tracking_number: TrackingNumber,
    pub buyer_name: String,
    pub address: String,
    pub courier: String,
    pub sent_before: OffsetDateTime,
    pub details: Vec<OrderDetail>,
}

/// Validates and normalizes a raw order.
///
/// This function checks field constraints only. It does NOT check
/// uniqueness of the order id or tracking number (that requires context).
///
/// # Arguments
///
/// * `order` - The raw order as submitted
///
/// # Returns
///
/// * `Ok(ValidatedOrder)` with trimmed identifiers and details
/// * `Err(DomainError)` if any field is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The order id or tracking number is empty
/// - `sent_before` is missing
/// - There are no detail lines
/// - A detail line has an empty SKU or a non-positive quantity
pub fn validate_new_order(order: &NewOrder) -> Result<ValidatedOrder, DomainError> {
    let order_ginee_id: OrderGineeId = OrderGineeId::new(&order.order_ginee_id)?;
    let tracking_number: TrackingNumber = TrackingNumber::new(&order.tracking_number)?;

    // Rule: the shipping deadline is mandatory
    let sent_before: OffsetDateTime = order.sent_before.ok_or(DomainError::MissingField {
        field: "sent_before",
    })?;

    // Rule: an order must contain something to pick
    if order.details.is_empty() {
        return Err(DomainError::MissingField { field: "details" });
    }

    let mut details: Vec<OrderDetail> = Vec::with_capacity(order.details.len());
    for raw in &order.details {
        let sku: &str = raw.sku.trim();
        if sku.is_empty() {
            return Err(DomainError::InvalidOrderDetail {
                sku: String::new(),
                reason: String::from("SKU cannot be empty"),
            });
        }
        if raw.quantity <= 0 {
            return Err(DomainError::InvalidOrderDetail {
                sku: sku.to_string(),
                reason: format!("Quantity must be greater than 0, got {}", raw.quantity),
            });
        }
        details.push(OrderDetail {
            order_detail_id: None,
            sku: sku.to_string(),
            product_name: raw.product_name.trim().to_string(),
            variant: raw
                .variant
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string),
            quantity: raw.quantity,
            price: raw.price,
            is_valid: false,
        });
    }

    Ok(ValidatedOrder {
        order_ginee_id,
        tracking_number,
        buyer_name: order.buyer_name.trim().to_string(),
        address: order.address.trim().to_string(),
        courier: order.courier.trim().to_string(),
        sent_before,
        details,
    })
}

/// Checks a scanned SKU and quantity against the order lines.
///
/// Returns the index of the matching detail so the caller can flag it.
/// Re-validating an already-valid line is allowed.
///
/// An order may list the same SKU on several lines. Each scan claims the
/// first line with that SKU and quantity that is still unvalidated, so
/// every line can be validated in turn.
///
/// # Errors
///
/// Returns `SkuNotFound` if no line has this SKU, or `QuantityMismatch`
/// if the scanned quantity differs from the ordered quantity.
pub fn validate_product(
    details: &[OrderDetail],
    sku: &str,
    quantity: i32,
) -> Result<usize, DomainError> {
    let sku: &str = sku.trim();
    if let Some(index) = details
        .iter()
        .position(|d| d.sku == sku && d.quantity == quantity && !d.is_valid)
    {
        return Ok(index);
    }

    let index: usize = details
        .iter()
        .position(|d| d.sku == sku && d.quantity == quantity)
        .or_else(|| details.iter().position(|d| d.sku == sku))
        .ok_or_else(|| DomainError::SkuNotFound {
            sku: sku.to_string(),
        })?;

    let expected: i32 = details[index].quantity;
    if expected != quantity {
        return Err(DomainError::QuantityMismatch {
            sku: sku.to_string(),
            expected,
            actual: quantity,
        });
    }

    Ok(index)
}

/// Ensures every order line has been validated by QC.
///
/// # Errors
///
/// Returns `ValidationIncomplete` listing the SKUs still pending.
pub fn ensure_all_validated(details: &[OrderDetail]) -> Result<(), DomainError> {
    let unvalidated_skus: Vec<String> = details
        .iter()
        .filter(|d| !d.is_valid)
        .map(|d| d.sku.clone())
        .collect();

    if unvalidated_skus.is_empty() {
        Ok(())
    } else {
        Err(DomainError::ValidationIncomplete { unvalidated_skus })
    }
}

/// Validates the box list submitted at QC completion.
///
/// Checks run in a fixed order so the reported error is deterministic:
/// emptiness, repeated ids, quantities, then existence.
///
/// # Arguments
///
/// * `boxes` - The submitted box details
/// * `known_boxes` - Ids of the boxes configured in the reference store
///
/// # Errors
///
/// Returns an error if:
/// - The list is empty
/// - A box id appears more than once
/// - A quantity is not greater than 0
/// - A box id does not exist
pub fn validate_box_details(
    boxes: &[QcBoxDetail],
    known_boxes: &BTreeSet<i64>,
) -> Result<(), DomainError> {
    if boxes.is_empty() {
        return Err(DomainError::EmptyBoxDetails);
    }

    let mut seen: HashSet<i64> = HashSet::new();
    for detail in boxes {
        if !seen.insert(detail.box_id) {
            return Err(DomainError::DuplicateBoxId(detail.box_id));
        }
    }

    if let Some(detail) = boxes.iter().find(|d| d.quantity <= 0) {
        return Err(DomainError::InvalidBoxQuantity {
            box_id: detail.box_id,
            quantity: detail.quantity,
        });
    }

    if let Some(detail) = boxes.iter().find(|d| !known_boxes.contains(&d.box_id)) {
        return Err(DomainError::BoxNotFound(detail.box_id));
    }

    Ok(())
}

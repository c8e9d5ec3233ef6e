// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk order ingest from JSON batches and CSV files.
//!
//! Every order is created in its own transaction. An order that already
//! exists is skipped, one that cannot be created is reported as failed,
//! and neither outcome affects the rest of the batch.

use csv::StringRecord;
use std::collections::HashMap;
use tracing::{debug, info};

use fulfillment::{Command, CommandContext};
use fulfillment_domain::{ValidatedOrder, validate_new_order};
use fulfillment_persistence::{ExecuteOutcome, Persistence};

use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::handlers::to_new_order;
use crate::request_response::{
    BulkCreateOrdersCsvRequest, BulkCreateOrdersRequest, BulkCreateOrdersResponse,
    BulkItemResult, CreateOrderRequest, OrderDetailInput,
};

/// Required CSV column headers (case-insensitive, normalized).
const REQUIRED_HEADERS: &[&str] = &[
    "order_ginee_id",
    "tracking_number",
    "buyer_name",
    "address",
    "courier",
    "sent_before",
    "sku",
    "product_name",
    "quantity",
    "price",
];

/// Why a CSV row could not become part of an order.
#[derive(Debug, thiserror::Error)]
enum CsvRowError {
    #[error("Row {row}: CSV parse error: {source}")]
    Parse { row: usize, source: csv::Error },
    #[error("Row {row}: '{field}' is required")]
    MissingField { row: usize, field: &'static str },
    #[error("Row {row}: '{field}' must be a whole number, got '{value}'")]
    NotANumber {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("Row {row}: '{field}' differs from the first row of order '{order_ginee_id}'")]
    Inconsistent {
        row: usize,
        field: &'static str,
        order_ginee_id: String,
    },
}

/// Normalizes a CSV header string for case-insensitive, whitespace-tolerant matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

fn validate_headers(headers: &StringRecord) -> Result<HashMap<String, usize>, ApiError> {
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| (normalize_header(header), idx))
        .collect();

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|h| !header_map.contains_key(*h))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("csv_content"),
            message: format!("Missing required headers: {}", missing.join(", ")),
        });
    }

    Ok(header_map)
}

/// One parsed CSV row: the order header fields and a single line.
struct CsvOrderRow {
    row: usize,
    order: CreateOrderRequest,
    detail: OrderDetailInput,
}

fn parse_row(
    row: usize,
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<CsvOrderRow, CsvRowError> {
    let get_field = |name: &str| -> Option<String> {
        header_map
            .get(name)
            .and_then(|&idx| record.get(idx))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    let required = |field: &'static str| -> Result<String, CsvRowError> {
        get_field(field).ok_or(CsvRowError::MissingField { row, field })
    };

    let quantity_raw: String = required("quantity")?;
    let quantity: i32 = quantity_raw
        .parse()
        .map_err(|_| CsvRowError::NotANumber {
            row,
            field: "quantity",
            value: quantity_raw.clone(),
        })?;
    let price_raw: String = required("price")?;
    let price: i64 = price_raw.parse().map_err(|_| CsvRowError::NotANumber {
        row,
        field: "price",
        value: price_raw.clone(),
    })?;

    Ok(CsvOrderRow {
        row,
        order: CreateOrderRequest {
            order_ginee_id: required("order_ginee_id")?,
            tracking_number: required("tracking_number")?,
            buyer_name: required("buyer_name")?,
            address: required("address")?,
            courier: required("courier")?,
            sent_before: get_field("sent_before"),
            details: Vec::new(),
        },
        detail: OrderDetailInput {
            sku: required("sku")?,
            product_name: required("product_name")?,
            variant: get_field("variant"),
            quantity,
            price,
        },
    })
}

/// Returns the first order header field that differs between two rows.
fn first_mismatch(a: &CreateOrderRequest, b: &CreateOrderRequest) -> Option<&'static str> {
    [
        ("tracking_number", a.tracking_number == b.tracking_number),
        ("buyer_name", a.buyer_name == b.buyer_name),
        ("address", a.address == b.address),
        ("courier", a.courier == b.courier),
        ("sent_before", a.sent_before == b.sent_before),
    ]
    .into_iter()
    .find_map(|(field, same)| (!same).then_some(field))
}

/// An order assembled from CSV rows, or the reason it cannot be.
enum CsvGroup {
    Order(CreateOrderRequest),
    Broken {
        order_ginee_id: String,
        tracking_number: String,
        reason: String,
    },
}

// ========================================================================
// Per-order ingest
// ========================================================================

fn item(
    order_ginee_id: &str,
    tracking_number: &str,
    order_id: Option<i64>,
    reason: Option<String>,
) -> BulkItemResult {
    BulkItemResult {
        order_ginee_id: Some(order_ginee_id.to_string()),
        tracking_number: Some(tracking_number.to_string()),
        order_id,
        reason,
    }
}

fn record_failed(response: &mut BulkCreateOrdersResponse, result: BulkItemResult) {
    response.failed_count += 1;
    response.failed.push(result);
}

fn record_skipped(response: &mut BulkCreateOrdersResponse, result: BulkItemResult) {
    response.skipped_count += 1;
    response.skipped.push(result);
}

fn record_created(response: &mut BulkCreateOrdersResponse, result: BulkItemResult) {
    response.created_count += 1;
    response.created.push(result);
}

/// Returns why an order is already present, if it is.
fn existing_reason(
    persistence: &mut Persistence,
    order: &ValidatedOrder,
) -> Result<Option<String>, ApiError> {
    if persistence
        .order_ginee_id_exists(order.order_ginee_id.value())
        .map_err(translate_persistence_error)?
    {
        return Ok(Some(format!(
            "Order '{}' already exists",
            order.order_ginee_id
        )));
    }
    if persistence
        .tracking_number_exists(&order.tracking_number)
        .map_err(translate_persistence_error)?
    {
        return Ok(Some(format!(
            "An order with tracking number '{}' already exists",
            order.tracking_number
        )));
    }
    Ok(None)
}

fn ingest_order(
    persistence: &mut Persistence,
    request: &CreateOrderRequest,
    ctx: &CommandContext,
    response: &mut BulkCreateOrdersResponse,
) {
    let raw_id: &str = &request.order_ginee_id;
    let raw_tn: &str = &request.tracking_number;

    let order: ValidatedOrder = match to_new_order(request)
        .and_then(|o| validate_new_order(&o).map_err(translate_domain_error))
    {
        Ok(order) => order,
        Err(err) => {
            record_failed(response, item(raw_id, raw_tn, None, Some(err.to_string())));
            return;
        }
    };
    let order_ginee_id: String = order.order_ginee_id.value().to_string();
    let tracking_number: String = order.tracking_number.value().to_string();

    match existing_reason(persistence, &order) {
        Ok(Some(reason)) => {
            debug!(order_ginee_id, reason, "Skipping existing order");
            record_skipped(
                response,
                item(&order_ginee_id, &tracking_number, None, Some(reason)),
            );
            return;
        }
        Ok(None) => {}
        Err(err) => {
            record_failed(
                response,
                item(&order_ginee_id, &tracking_number, None, Some(err.to_string())),
            );
            return;
        }
    }

    match persistence.execute(Command::CreateOrder { order }, ctx) {
        Ok(ExecuteOutcome::Applied(applied)) => {
            let order_id: Option<i64> = applied.shipment.order.as_ref().and_then(|o| o.order_id);
            record_created(
                response,
                item(&order_ginee_id, &tracking_number, order_id, None),
            );
        }
        Ok(ExecuteOutcome::Unchanged { message }) => {
            record_skipped(
                response,
                item(&order_ginee_id, &tracking_number, None, Some(message)),
            );
        }
        Err(err) => match translate_persistence_error(err) {
            conflict @ ApiError::Conflict { .. } => record_skipped(
                response,
                item(
                    &order_ginee_id,
                    &tracking_number,
                    None,
                    Some(conflict.to_string()),
                ),
            ),
            other => record_failed(
                response,
                item(&order_ginee_id, &tracking_number, None, Some(other.to_string())),
            ),
        },
    }
}

fn log_summary(source: &str, response: &BulkCreateOrdersResponse) {
    info!(
        source,
        total = response.total,
        created = response.created_count,
        skipped = response.skipped_count,
        failed = response.failed_count,
        "Bulk order ingest finished"
    );
}

// ========================================================================
// Entry points
// ========================================================================

/// Creates every order in a batch, each in its own transaction.
///
/// # Errors
///
/// This function does not fail per order; problems are reported in the
/// response buckets. It only returns an error for a malformed request.
pub fn bulk_create_orders(
    persistence: &mut Persistence,
    request: &BulkCreateOrdersRequest,
    ctx: &CommandContext,
) -> Result<BulkCreateOrdersResponse, ApiError> {
    let mut response: BulkCreateOrdersResponse = BulkCreateOrdersResponse {
        total: request.orders.len(),
        ..BulkCreateOrdersResponse::default()
    };

    for order in &request.orders {
        ingest_order(persistence, order, ctx, &mut response);
    }

    log_summary("json", &response);
    Ok(response)
}

/// Creates orders from CSV content.
///
/// Each row holds one order line. Rows sharing an `order_ginee_id` are
/// merged into one order in first-seen order; their order header fields
/// must agree. A row that cannot be parsed counts as one failed item.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the header row is unreadable or is
/// missing a required column.
pub fn bulk_create_orders_from_csv(
    persistence: &mut Persistence,
    request: &BulkCreateOrdersCsvRequest,
    ctx: &CommandContext,
) -> Result<BulkCreateOrdersResponse, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(request.csv_content.as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ApiError::InvalidInput {
            field: String::from("csv_content"),
            message: format!("Failed to read CSV headers: {e}"),
        })?
        .clone();
    let header_map: HashMap<String, usize> = validate_headers(&headers)?;

    let mut groups: Vec<CsvGroup> = Vec::new();
    let mut group_index: HashMap<String, usize> = HashMap::new();
    let mut row_errors: Vec<CsvRowError> = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let row: usize = idx + 1;
        let parsed: Result<CsvOrderRow, CsvRowError> = result
            .map_err(|source| CsvRowError::Parse { row, source })
            .and_then(|record| parse_row(row, &record, &header_map));
        let parsed: CsvOrderRow = match parsed {
            Ok(parsed) => parsed,
            Err(err) => {
                row_errors.push(err);
                continue;
            }
        };

        let key: String = parsed.order.order_ginee_id.clone();
        let Some(&slot) = group_index.get(&key) else {
            let mut order: CreateOrderRequest = parsed.order;
            order.details.push(parsed.detail);
            group_index.insert(key, groups.len());
            groups.push(CsvGroup::Order(order));
            continue;
        };

        let broken: Option<CsvGroup> = match &mut groups[slot] {
            CsvGroup::Order(existing) => match first_mismatch(existing, &parsed.order) {
                Some(field) => {
                    let err = CsvRowError::Inconsistent {
                        row: parsed.row,
                        field,
                        order_ginee_id: key.clone(),
                    };
                    Some(CsvGroup::Broken {
                        order_ginee_id: key,
                        tracking_number: existing.tracking_number.clone(),
                        reason: err.to_string(),
                    })
                }
                None => {
                    existing.details.push(parsed.detail);
                    None
                }
            },
            CsvGroup::Broken { .. } => None,
        };
        if let Some(broken) = broken {
            groups[slot] = broken;
        }
    }

    let mut response: BulkCreateOrdersResponse = BulkCreateOrdersResponse {
        total: groups.len() + row_errors.len(),
        ..BulkCreateOrdersResponse::default()
    };

    for err in row_errors {
        record_failed(
            &mut response,
            BulkItemResult {
                order_ginee_id: None,
                tracking_number: None,
                order_id: None,
                reason: Some(err.to_string()),
            },
        );
    }

    for group in groups {
        match group {
            CsvGroup::Order(order) => ingest_order(persistence, &order, ctx, &mut response),
            CsvGroup::Broken {
                order_ginee_id,
                tracking_number,
                reason,
            } => record_failed(
                &mut response,
                item(&order_ginee_id, &tracking_number, None, Some(reason)),
            ),
        }
    }

    log_summary("csv", &response);
    Ok(response)
}

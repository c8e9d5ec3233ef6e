// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fulfillment_domain::Complaint;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{flag, format_timestamp};
use crate::diesel_schema::{complaint_product_details, complaint_user_details, complaints};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a complaint with one row per liable user and one row per
/// product in the order snapshot.
///
/// # Errors
///
/// Returns `UniqueViolation` if a complaint is already filed for the
/// tracking number, or another error if an insert fails.
pub fn insert_complaint(conn: &mut _, complaint: &Complaint) -> Result<i64, PersistenceError> {
    diesel::insert_into(complaints::table)
        .values((
            complaints::tracking_number.eq(complaint.tracking_number.value()),
            complaints::order_ginee_id.eq(complaint.order_ginee_id.value()),
            complaints::channel_id.eq(complaint.channel_id),
            complaints::store_id.eq(complaint.store_id),
            complaints::reason.eq(&complaint.reason),
            complaints::total_fee.eq(complaint.total_fee),
            complaints::solution.eq(complaint.solution.as_deref()),
            complaints::checked.eq(flag(complaint.checked)),
            complaints::created_by.eq(complaint.created_by),
            complaints::created_at.eq(format_timestamp(complaint.created_at)?),
        ))
        .execute(conn)?;

    let complaint_id: i64 = conn.get_last_insert_rowid()?;

    for user in &complaint.users {
        diesel::insert_into(complaint_user_details::table)
            .values((
                complaint_user_details::complaint_id.eq(complaint_id),
                complaint_user_details::user_id.eq(user.user_id),
                complaint_user_details::fee_charge.eq(user.fee_charge),
            ))
            .execute(conn)?;
    }

    for product in &complaint.products {
        diesel::insert_into(complaint_product_details::table)
            .values((
                complaint_product_details::complaint_id.eq(complaint_id),
                complaint_product_details::sku.eq(&product.sku),
                complaint_product_details::product_name.eq(&product.product_name),
                complaint_product_details::variant.eq(product.variant.as_deref()),
                complaint_product_details::quantity.eq(product.quantity),
                complaint_product_details::price.eq(product.price),
            ))
            .execute(conn)?;
    }

    debug!(
        complaint_id,
        tracking_number = %complaint.tracking_number,
        liable_users = complaint.users.len(),
        products = complaint.products.len(),
        "Inserted complaint"
    );
    Ok(complaint_id)
}
}

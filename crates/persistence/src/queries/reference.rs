// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference-data lookups consulted by transitions.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fulfillment_domain::Expedition;
use std::collections::BTreeSet;

use crate::diesel_schema::{expeditions, orders, packing_boxes, users};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = expeditions)]
struct ExpeditionRow {
    expedition_id: i64,
    code: String,
    name: String,
    slug: String,
    color: String,
}

backend_fn! {
/// Returns true if any order already uses this external order id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn order_ginee_id_exists(conn: &mut _, order_ginee_id: &str) -> Result<bool, PersistenceError> {
    let count: i64 = orders::table
        .filter(orders::order_ginee_id.eq(order_ginee_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Returns true if an order is stored under this tracking number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn tracking_number_exists(conn: &mut _, tracking_number: &str) -> Result<bool, PersistenceError> {
    let count: i64 = orders::table
        .filter(orders::tracking_number.eq(tracking_number))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
}

backend_fn! {
/// Returns the subset of `user_ids` that exist.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn existing_user_ids(conn: &mut _, user_ids: &[i64]) -> Result<BTreeSet<i64>, PersistenceError> {
    if user_ids.is_empty() {
        return Ok(BTreeSet::new());
    }
    let found: Vec<i64> = users::table
        .filter(users::user_id.eq_any(user_ids))
        .select(users::user_id)
        .load(conn)?;
    Ok(found.into_iter().collect())
}
}

backend_fn! {
/// Returns the subset of `box_ids` that exist.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn existing_box_ids(conn: &mut _, box_ids: &[i64]) -> Result<BTreeSet<i64>, PersistenceError> {
    if box_ids.is_empty() {
        return Ok(BTreeSet::new());
    }
    let found: Vec<i64> = packing_boxes::table
        .filter(packing_boxes::box_id.eq_any(box_ids))
        .select(packing_boxes::box_id)
        .load(conn)?;
    Ok(found.into_iter().collect())
}
}

backend_fn! {
/// Lists every configured expedition, lowest id first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_expeditions(conn: &mut _) -> Result<Vec<Expedition>, PersistenceError> {
    let rows: Vec<ExpeditionRow> = expeditions::table
        .order(expeditions::expedition_id.asc())
        .select(ExpeditionRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| Expedition {
            expedition_id: row.expedition_id,
            code: row.code,
            name: row.name,
            slug: row.slug,
            color: row.color,
        })
        .collect())
}
}

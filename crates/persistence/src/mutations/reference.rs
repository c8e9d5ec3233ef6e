// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Minimal writers for reference data owned by external collaborators.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{expeditions, packing_boxes, users};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a user.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_user(conn: &mut _, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(users::table)
        .values(users::name.eq(name))
        .execute(conn)?;
    let user_id: i64 = conn.get_last_insert_rowid()?;
    info!(user_id, name, "Inserted user");
    Ok(user_id)
}
}

backend_fn! {
/// Inserts a packing box type.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_packing_box(conn: &mut _, name: &str) -> Result<i64, PersistenceError> {
    diesel::insert_into(packing_boxes::table)
        .values(packing_boxes::name.eq(name))
        .execute(conn)?;
    let box_id: i64 = conn.get_last_insert_rowid()?;
    info!(box_id, name, "Inserted packing box");
    Ok(box_id)
}
}

backend_fn! {
/// Inserts an expedition matched by tracking number prefix `code`.
///
/// # Errors
///
/// Returns `UniqueViolation` if the code is taken, or another error if the
/// insert fails.
pub fn insert_expedition(
    conn: &mut _,
    code: &str,
    name: &str,
    slug: &str,
    color: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(expeditions::table)
        .values((
            expeditions::code.eq(code),
            expeditions::name.eq(name),
            expeditions::slug.eq(slug),
            expeditions::color.eq(color),
        ))
        .execute(conn)?;
    let expedition_id: i64 = conn.get_last_insert_rowid()?;
    info!(expedition_id, code, "Inserted expedition");
    Ok(expedition_id)
}
}

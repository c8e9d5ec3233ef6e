// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fulfillment_domain::OutboundRecord;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{flag, format_timestamp};
use crate::diesel_schema::outbounds;
use crate::error::PersistenceError;

backend_fn! {
/// Inserts an outbound record with its resolved carrier.
///
/// # Errors
///
/// Returns `UniqueViolation` if the tracking number already went out, or
/// another error if the insert fails.
pub fn insert_outbound(conn: &mut _, outbound: &OutboundRecord) -> Result<i64, PersistenceError> {
    diesel::insert_into(outbounds::table)
        .values((
            outbounds::tracking_number.eq(outbound.tracking_number.value()),
            outbounds::outbound_by.eq(outbound.outbound_by),
            outbounds::expedition.eq(&outbound.carrier.expedition),
            outbounds::expedition_slug.eq(&outbound.carrier.slug),
            outbounds::expedition_color.eq(&outbound.carrier.color),
            outbounds::complained.eq(flag(outbound.complained)),
            outbounds::created_at.eq(format_timestamp(outbound.created_at)?),
        ))
        .execute(conn)?;

    let outbound_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        outbound_id,
        tracking_number = %outbound.tracking_number,
        expedition = %outbound.carrier.expedition,
        "Inserted outbound record"
    );
    Ok(outbound_id)
}
}

backend_fn! {
/// Writes the complaint flag of an outbound record.
///
/// # Errors
///
/// Returns an error if the record has no id or the update fails.
pub fn update_outbound(conn: &mut _, outbound: &OutboundRecord) -> Result<(), PersistenceError> {
    let outbound_id: i64 = outbound
        .outbound_id
        .ok_or(PersistenceError::MissingRowId("outbound record"))?;

    diesel::update(outbounds::table.filter(outbounds::outbound_id.eq(outbound_id)))
        .set(outbounds::complained.eq(flag(outbound.complained)))
        .execute(conn)?;
    Ok(())
}
}

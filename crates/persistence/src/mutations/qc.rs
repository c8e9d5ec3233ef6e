// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! QC record writes. Both lanes share one table.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fulfillment_domain::{QcBoxDetail, QcRecord};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{flag, format_timestamp};
use crate::diesel_schema::{qc_box_details, qc_records};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts a QC record.
///
/// # Errors
///
/// Returns `UniqueViolation` if any lane already holds a record for the
/// tracking number, or another error if the insert fails.
pub fn insert_qc(conn: &mut _, qc: &QcRecord) -> Result<i64, PersistenceError> {
    diesel::insert_into(qc_records::table)
        .values((
            qc_records::lane.eq(qc.lane.as_str()),
            qc_records::tracking_number.eq(qc.tracking_number.value()),
            qc_records::qc_by.eq(qc.qc_by),
            qc_records::status.eq(qc.status.as_str()),
            qc_records::complained.eq(flag(qc.complained)),
            qc_records::created_at.eq(format_timestamp(qc.created_at)?),
            qc_records::updated_at.eq(format_timestamp(qc.updated_at)?),
        ))
        .execute(conn)?;

    let qc_id: i64 = conn.get_last_insert_rowid()?;
    debug!(qc_id, lane = %qc.lane, tracking_number = %qc.tracking_number, "Inserted QC record");
    Ok(qc_id)
}
}

backend_fn! {
/// Writes status, complaint flag and update time of a QC record.
///
/// # Errors
///
/// Returns an error if the record has no id or the update fails.
pub fn update_qc(conn: &mut _, qc: &QcRecord) -> Result<(), PersistenceError> {
    let qc_id: i64 = qc.qc_id.ok_or(PersistenceError::MissingRowId("QC record"))?;

    diesel::update(qc_records::table.filter(qc_records::qc_id.eq(qc_id)))
        .set((
            qc_records::status.eq(qc.status.as_str()),
            qc_records::complained.eq(flag(qc.complained)),
            qc_records::updated_at.eq(format_timestamp(qc.updated_at)?),
        ))
        .execute(conn)?;

    debug!(qc_id, status = %qc.status, "Updated QC record");
    Ok(())
}
}

backend_fn! {
/// Inserts the box rows recorded when QC completes.
///
/// # Errors
///
/// Returns an error if a box does not exist, a box repeats, or the insert
/// fails.
pub fn insert_qc_boxes(
    conn: &mut _,
    qc_id: i64,
    boxes: &[QcBoxDetail],
) -> Result<(), PersistenceError> {
    for detail in boxes {
        diesel::insert_into(qc_box_details::table)
            .values((
                qc_box_details::qc_id.eq(qc_id),
                qc_box_details::box_id.eq(detail.box_id),
                qc_box_details::quantity.eq(detail.quantity),
            ))
            .execute(conn)?;
    }
    debug!(qc_id, boxes = boxes.len(), "Inserted QC box details");
    Ok(())
}
}

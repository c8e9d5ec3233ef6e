// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fulfillment_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use fulfillment_domain::TrackingNumber;

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData, parse_timestamp};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for full audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    tracking_number: String,
    #[allow(dead_code)]
    actor_user_id: i64,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    created_at: String,
}

fn event_from_row(row: AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let actor_data: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause_data: CauseData = serde_json::from_str(&row.cause_json)?;
    let action_data: ActionData = serde_json::from_str(&row.action_json)?;
    let before_data: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
    let after_data: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;

    Ok(AuditEvent::new(
        TrackingNumber::from_persisted(row.tracking_number),
        Actor::new(actor_data.user_id, actor_data.actor_type),
        Cause::new(cause_data.id, cause_data.description),
        Action::new(action_data.name, action_data.details),
        StateSnapshot::new(before_data.data),
        StateSnapshot::new(after_data.data),
        parse_timestamp(&row.created_at)?,
    )
    .with_event_id(row.event_id))
}

backend_fn! {
/// Retrieves an audit event by ID.
///
/// # Errors
///
/// Returns `NotFound` if no event has this id, or an error if the row
/// cannot be deserialized.
pub fn get_audit_event(conn: &mut _, event_id: i64) -> Result<AuditEvent, PersistenceError> {
    let row: AuditEventRow = audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("audit event {event_id}")))?;

    event_from_row(row)
}
}

backend_fn! {
/// Retrieves every audit event filed under a tracking number, in the order
/// the transitions were applied.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be deserialized.
pub fn get_audit_timeline(
    conn: &mut _,
    tracking_number: &TrackingNumber,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::tracking_number.eq(tracking_number.value()))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;

    rows.into_iter().map(event_from_row).collect()
}
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use fulfillment_audit::AuditEvent;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData, format_timestamp};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

backend_fn! {
/// Persists an audit event.
///
/// Actor, cause, action and both snapshots are stored as JSON documents
/// next to the indexed tracking number and actor id.
///
/// # Arguments
///
/// * `conn` - The active database connection
/// * `event` - The audit event to persist
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn persist_audit_event(conn: &mut _, event: &AuditEvent) -> Result<i64, PersistenceError> {
    let actor_json: String = serde_json::to_string(&ActorData {
        user_id: event.actor.user_id,
        actor_type: event.actor.actor_type.clone(),
    })?;
    let cause_json: String = serde_json::to_string(&CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    })?;
    let action_json: String = serde_json::to_string(&ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    })?;
    let before_json: String = serde_json::to_string(&StateSnapshotData {
        data: event.before.data.clone(),
    })?;
    let after_json: String = serde_json::to_string(&StateSnapshotData {
        data: event.after.data.clone(),
    })?;

    diesel::insert_into(audit_events::table)
        .values((
            audit_events::tracking_number.eq(event.tracking_number.value()),
            audit_events::actor_user_id.eq(event.actor.user_id),
            audit_events::actor_json.eq(&actor_json),
            audit_events::cause_json.eq(&cause_json),
            audit_events::action_json.eq(&action_json),
            audit_events::before_snapshot_json.eq(&before_json),
            audit_events::after_snapshot_json.eq(&after_json),
            audit_events::created_at.eq(format_timestamp(event.occurred_at)?),
        ))
        .execute(conn)?;

    let event_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        event_id,
        tracking_number = %event.tracking_number,
        action = %event.action.name,
        "Persisted audit event"
    );

    Ok(event_id)
}
}

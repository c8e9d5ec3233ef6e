// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub user_id: i64,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// Timestamps are stored as RFC 3339 text on every backend.
pub(crate) fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    Ok(value.format(&Rfc3339)?)
}

pub(crate) fn format_optional_timestamp(
    value: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    value.map(format_timestamp).transpose()
}

pub(crate) fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::InvalidData(format!("timestamp '{value}': {e}")))
}

pub(crate) fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}

/// Booleans are stored as `0`/`1` integers on every backend.
pub(crate) fn flag(value: bool) -> i32 {
    i32::from(value)
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fulfillment::CoreError;

/// Storage failures, plus commands the state machine refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// Diesel reported an error not covered by a more specific variant.
    DatabaseError(String),
    DatabaseConnectionFailed(String),
    MigrationFailed(String),
    /// A raw SQL statement (pragma, row lock, rowid lookup) failed.
    QueryFailed(String),
    /// JSON or timestamp encoding failed.
    SerializationError(String),
    InitializationError(String),
    /// `PRAGMA foreign_keys` is off, or `MySQL` has `foreign_key_checks` disabled.
    ForeignKeyEnforcementNotEnabled,
    /// A unique index rejected a write.
    ///
    /// Raised when two transactions race past the same existence check.
    UniqueViolation(String),
    /// The command was rejected by the state machine. Nothing was written.
    Rejected(CoreError),
    /// A stored row could not be converted back into a domain value.
    InvalidData(String),
    /// A write needed the id of a row that was never persisted.
    MissingRowId(&'static str),
    /// A row looked up by id does not exist.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::UniqueViolation(msg) => write!(f, "Unique constraint violated: {msg}"),
            Self::Rejected(err) => write!(f, "{err}"),
            Self::InvalidData(msg) => write!(f, "Invalid stored data: {msg}"),
            Self::MissingRowId(what) => write!(f, "Cannot write {what}: row has no id"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                info,
            ) => Self::UniqueViolation(info.message().to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<CoreError> for PersistenceError {
    fn from(err: CoreError) -> Self {
        Self::Rejected(err)
    }
}

impl From<time::error::Format> for PersistenceError {
    fn from(err: time::error::Format) -> Self {
        Self::SerializationError(err.to_string())
    }
}

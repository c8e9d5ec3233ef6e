// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates backend-specific initialization, migration,
//! locking and helper functions that cannot be expressed in
//! backend-agnostic Diesel DSL.
//!
//! ## Backend Support
//!
//! - `sqlite`: `SQLite` backend (default for development and testing)
//! - `mysql`: MySQL/MariaDB backend (validated via opt-in tests)
//!
//! All shipment queries and mutations live in `queries/` and `mutations/`
//! and must work across all supported backends.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;

/// Trait for backend-specific operations.
///
/// Implemented for both `SqliteConnection` and `MysqlConnection`, so the
/// functions generated by `backend_fn!` can call these helpers through
/// `conn` with a single body.
pub trait PersistenceBackend: Connection {
    /// Retrieves the last inserted row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Serializes writers on one tracking number for the rest of the
    /// current transaction.
    ///
    /// Must be called inside a transaction, before the shipment is loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock query fails.
    fn lock_shipment(&mut self, tracking_number: &str) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn lock_shipment(&mut self, _tracking_number: &str) -> Result<(), PersistenceError> {
        // BEGIN IMMEDIATE already holds the database write lock.
        Ok(())
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }

    fn lock_shipment(&mut self, tracking_number: &str) -> Result<(), PersistenceError> {
        mysql::lock_shipment(self, tracking_number)
    }
}

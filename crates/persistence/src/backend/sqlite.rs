// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite-specific backend utilities.
//!
//! Connection setup, migrations and the few helpers that need raw SQL.
//! Every connection gets the same pragmas:
//!
//! - `foreign_keys = ON`, verified after migrations run
//! - `busy_timeout`, so a second writer waits on `BEGIN IMMEDIATE` instead
//!   of failing straight away
//! - `journal_mode = WAL` for file-backed databases only

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::error::PersistenceError;

/// SQLite-specific migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a connection waits for another writer, in milliseconds.
pub const BUSY_TIMEOUT_MS: u32 = 5000;

/// Row returned by `PRAGMA foreign_keys`.
///
/// Diesel has no PRAGMA DSL, so pragmas go through `sql_query`.
#[derive(QueryableByName)]
struct ForeignKeysPragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Returns the rowid of the last row inserted on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Verifies that foreign key enforcement is enabled.
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` if `PRAGMA foreign_keys` is off.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeysPragma = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;
    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    info!("SQLite foreign key enforcement is enabled");
    Ok(())
}

/// Runs pending migrations on the provided connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running SQLite database migrations");
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Applies the per-connection pragmas.
///
/// # Errors
///
/// Returns an error if a `PRAGMA` statement fails.
pub fn configure_connection(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    for statement in [
        String::from("PRAGMA foreign_keys = ON"),
        format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"),
    ] {
        diesel::sql_query(&statement)
            .execute(conn)
            .map_err(|e| PersistenceError::QueryFailed(format!("{statement}: {e}")))?;
    }
    debug!(busy_timeout_ms = BUSY_TIMEOUT_MS, "Configured SQLite connection");
    Ok(())
}

/// Opens a `SQLite` database, configures it and runs migrations.
///
/// # Arguments
///
/// * `database_url` - A file path or a `file:` URI
///
/// # Errors
///
/// Returns an error if connection, configuration or migration fails.
pub fn initialize_database(database_url: &str) -> Result<SqliteConnection, PersistenceError> {
    info!("Initializing SQLite database at: {}", database_url);

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;
    configure_connection(&mut conn)?;
    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Switches a file-backed database to write-ahead logging.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    diesel::sql_query("PRAGMA journal_mode = WAL")
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(())
}
